//! Immutable EQ parameter snapshot consumed by the filter designers.

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_CUT_SECTIONS, MAX_FREQ_HZ, MIN_FREQ_HZ};

const DEFAULT_LOW_CUT_FREQ_HZ: f32 = 20.0;
const DEFAULT_HIGH_CUT_FREQ_HZ: f32 = 20_000.0;
const DEFAULT_PEAK_FREQ_HZ: f32 = 750.0;
const DEFAULT_PEAK_GAIN_DB: f32 = 0.0;
const DEFAULT_PEAK_QUALITY: f32 = 1.0;
pub(crate) const MIN_QUALITY: f32 = 0.1;
pub(crate) const MAX_QUALITY: f32 = 10.0;
pub(crate) const MIN_GAIN_DB: f32 = -24.0;
pub(crate) const MAX_GAIN_DB: f32 = 24.0;

/// Cut-filter steepness.
///
/// Each step adds one 2nd-order section (12 dB/oct) to the cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Slope {
    #[default]
    Db12,
    Db24,
    Db36,
    Db48,
}

impl Slope {
    pub const ALL: [Slope; MAX_CUT_SECTIONS] = [Slope::Db12, Slope::Db24, Slope::Db36, Slope::Db48];

    /// Number of cascaded biquad sections (1..=4).
    pub fn sections(self) -> usize {
        self as usize + 1
    }

    /// Butterworth order realised by this slope.
    pub fn order(self) -> usize {
        self.sections() * 2
    }

    pub fn db_per_octave(self) -> u32 {
        self.sections() as u32 * 12
    }

    /// Choice index as stored by the host (`0..=3`), clamped.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index.min(MAX_CUT_SECTIONS - 1)]
    }

    /// Decode a raw host choice value, rounding to the nearest index.
    pub fn from_choice_value(value: f32) -> Self {
        if !value.is_finite() || value <= 0.0 {
            return Slope::Db12;
        }
        Self::from_index(value.round() as usize)
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Display label used for the host choice list.
    pub fn label(self) -> &'static str {
        match self {
            Slope::Db12 => "12 db/Oct",
            Slope::Db24 => "24 db/Oct",
            Slope::Db36 => "36 db/Oct",
            Slope::Db48 => "48 db/Oct",
        }
    }
}

impl TryFrom<u32> for Slope {
    type Error = String;

    fn try_from(db_per_octave: u32) -> Result<Self, Self::Error> {
        match db_per_octave {
            12 => Ok(Slope::Db12),
            24 => Ok(Slope::Db24),
            36 => Ok(Slope::Db36),
            48 => Ok(Slope::Db48),
            other => Err(format!(
                "unsupported slope {} dB/oct (expected 12, 24, 36 or 48)",
                other
            )),
        }
    }
}

impl From<Slope> for u32 {
    fn from(slope: Slope) -> Self {
        slope.db_per_octave()
    }
}

/// Snapshot of every EQ parameter at one instant.
///
/// Field aliases accept the host parameter names for the continuous values and
/// bypass flags, so hand-written settings files can use either spelling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainSettings {
    #[serde(alias = "LowCut Freq")]
    pub low_cut_freq: f32,
    #[serde(alias = "HighCut Freq")]
    pub high_cut_freq: f32,
    #[serde(alias = "Peak Freq")]
    pub peak_freq: f32,
    #[serde(alias = "Peak Gain")]
    pub peak_gain_db: f32,
    #[serde(alias = "Peak Quality")]
    pub peak_quality: f32,
    #[serde(alias = "LowCut Slope")]
    pub low_cut_slope: Slope,
    #[serde(alias = "HighCut Slope")]
    pub high_cut_slope: Slope,
    #[serde(alias = "LowCut Bypassed")]
    pub low_cut_bypassed: bool,
    #[serde(alias = "Peak Bypassed")]
    pub peak_bypassed: bool,
    #[serde(alias = "HighCut Bypassed")]
    pub high_cut_bypassed: bool,
}

impl Default for ChainSettings {
    fn default() -> Self {
        Self {
            low_cut_freq: DEFAULT_LOW_CUT_FREQ_HZ,
            high_cut_freq: DEFAULT_HIGH_CUT_FREQ_HZ,
            peak_freq: DEFAULT_PEAK_FREQ_HZ,
            peak_gain_db: DEFAULT_PEAK_GAIN_DB,
            peak_quality: DEFAULT_PEAK_QUALITY,
            low_cut_slope: Slope::Db12,
            high_cut_slope: Slope::Db12,
            low_cut_bypassed: false,
            peak_bypassed: false,
            high_cut_bypassed: false,
        }
    }
}

impl ChainSettings {
    /// Clamp every field into the domain the filter designers accept at
    /// `sample_rate`.
    ///
    /// Frequencies stay strictly below Nyquist, Q stays positive and gain stays
    /// within ±24 dB. Non-finite fields fall back to their defaults.
    pub fn sanitized(&self, sample_rate: f64) -> Self {
        let defaults = Self::default();
        Self {
            low_cut_freq: sanitize_freq(self.low_cut_freq, defaults.low_cut_freq, sample_rate),
            high_cut_freq: sanitize_freq(self.high_cut_freq, defaults.high_cut_freq, sample_rate),
            peak_freq: sanitize_freq(self.peak_freq, defaults.peak_freq, sample_rate),
            peak_gain_db: sanitize_range(
                self.peak_gain_db,
                defaults.peak_gain_db,
                MIN_GAIN_DB,
                MAX_GAIN_DB,
            ),
            peak_quality: sanitize_range(
                self.peak_quality,
                defaults.peak_quality,
                MIN_QUALITY,
                MAX_QUALITY,
            ),
            ..*self
        }
    }
}

fn sanitize_freq(freq: f32, fallback: f32, sample_rate: f64) -> f32 {
    let freq = if freq.is_finite() { freq } else { fallback };
    let nyquist = (sample_rate / 2.0) as f32;
    let upper = (nyquist - 1.0).min(MAX_FREQ_HZ as f32).max(1.0);
    let lower = (MIN_FREQ_HZ as f32).min(upper);
    freq.clamp(lower, upper)
}

fn sanitize_range(value: f32, fallback: f32, min: f32, max: f32) -> f32 {
    if !value.is_finite() {
        return fallback;
    }
    value.clamp(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slope_sections_follow_choice_index() {
        assert_eq!(Slope::Db12.sections(), 1);
        assert_eq!(Slope::Db48.sections(), 4);
        assert_eq!(Slope::Db36.order(), 6);
        assert_eq!(Slope::from_choice_value(2.4), Slope::Db36);
        assert_eq!(Slope::from_choice_value(9.0), Slope::Db48);
        assert_eq!(Slope::from_choice_value(f32::NAN), Slope::Db12);
    }

    #[test]
    fn sanitized_keeps_frequencies_below_nyquist() {
        let settings = ChainSettings {
            high_cut_freq: 20_000.0,
            peak_freq: f32::INFINITY,
            peak_quality: 0.0,
            peak_gain_db: 60.0,
            ..ChainSettings::default()
        };
        let clean = settings.sanitized(32_000.0);
        assert!(clean.high_cut_freq < 16_000.0);
        assert_eq!(clean.peak_freq, 750.0);
        assert_eq!(clean.peak_quality, MIN_QUALITY);
        assert_eq!(clean.peak_gain_db, MAX_GAIN_DB);
        assert_eq!(clean.low_cut_slope, settings.low_cut_slope);
    }

    #[test]
    fn deserializes_host_parameter_names_and_slopes() {
        let json = r#"{
            "LowCut Freq": 80.0,
            "Peak Gain": -6.5,
            "low_cut_slope": 36,
            "HighCut Bypassed": true
        }"#;
        let settings: ChainSettings = serde_json::from_str(json).expect("deserialize settings");
        assert_eq!(settings.low_cut_freq, 80.0);
        assert_eq!(settings.peak_gain_db, -6.5);
        assert_eq!(settings.low_cut_slope, Slope::Db36);
        assert!(settings.high_cut_bypassed);
        assert_eq!(settings.peak_freq, 750.0);
    }

    #[test]
    fn rejects_unknown_slopes() {
        let result: Result<ChainSettings, _> = serde_json::from_str(r#"{"high_cut_slope": 18}"#);
        assert!(result.is_err());
    }
}
