//! Host parameter table: ids, ranges, defaults and normalisation.

use super::settings::{Slope, MAX_GAIN_DB, MAX_QUALITY, MIN_GAIN_DB, MIN_QUALITY};
use crate::constants::{MAX_FREQ_HZ, MIN_FREQ_HZ};

/// Every parameter the EQ exposes to a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterId {
    LowCutFreq,
    HighCutFreq,
    PeakFreq,
    PeakGain,
    PeakQuality,
    LowCutSlope,
    HighCutSlope,
    LowCutBypassed,
    PeakBypassed,
    HighCutBypassed,
    AnalyzerEnabled,
}

/// How a host should present and quantise a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    Float,
    Choice,
    Toggle,
}

impl ParameterId {
    pub const COUNT: usize = 11;

    pub const ALL: [ParameterId; Self::COUNT] = [
        ParameterId::LowCutFreq,
        ParameterId::HighCutFreq,
        ParameterId::PeakFreq,
        ParameterId::PeakGain,
        ParameterId::PeakQuality,
        ParameterId::LowCutSlope,
        ParameterId::HighCutSlope,
        ParameterId::LowCutBypassed,
        ParameterId::PeakBypassed,
        ParameterId::HighCutBypassed,
        ParameterId::AnalyzerEnabled,
    ];

    /// Position in [`ParameterId::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Stable host-facing name, also used as the key in saved state.
    pub fn name(self) -> &'static str {
        match self {
            ParameterId::LowCutFreq => "LowCut Freq",
            ParameterId::HighCutFreq => "HighCut Freq",
            ParameterId::PeakFreq => "Peak Freq",
            ParameterId::PeakGain => "Peak Gain",
            ParameterId::PeakQuality => "Peak Quality",
            ParameterId::LowCutSlope => "LowCut Slope",
            ParameterId::HighCutSlope => "HighCut Slope",
            ParameterId::LowCutBypassed => "LowCut Bypassed",
            ParameterId::PeakBypassed => "Peak Bypassed",
            ParameterId::HighCutBypassed => "HighCut Bypassed",
            ParameterId::AnalyzerEnabled => "Analyzer Enabled",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|id| id.name() == name)
    }

    pub fn kind(self) -> ParameterKind {
        match self {
            ParameterId::LowCutSlope | ParameterId::HighCutSlope => ParameterKind::Choice,
            ParameterId::LowCutBypassed
            | ParameterId::PeakBypassed
            | ParameterId::HighCutBypassed
            | ParameterId::AnalyzerEnabled => ParameterKind::Toggle,
            _ => ParameterKind::Float,
        }
    }

    pub fn range(self) -> ParameterRange {
        let freq = ParameterRange::new(MIN_FREQ_HZ as f32, MAX_FREQ_HZ as f32, 1.0, 0.25);
        match self {
            ParameterId::LowCutFreq | ParameterId::HighCutFreq | ParameterId::PeakFreq => freq,
            ParameterId::PeakGain => ParameterRange::new(MIN_GAIN_DB, MAX_GAIN_DB, 0.5, 1.0),
            ParameterId::PeakQuality => ParameterRange::new(MIN_QUALITY, MAX_QUALITY, 0.05, 1.0),
            ParameterId::LowCutSlope | ParameterId::HighCutSlope => {
                ParameterRange::new(0.0, (Slope::ALL.len() - 1) as f32, 1.0, 1.0)
            }
            _ => ParameterRange::new(0.0, 1.0, 1.0, 1.0),
        }
    }

    /// Plain (un-normalised) default value.
    pub fn default_value(self) -> f32 {
        match self {
            ParameterId::LowCutFreq => 20.0,
            ParameterId::HighCutFreq => 20_000.0,
            ParameterId::PeakFreq => 750.0,
            ParameterId::PeakGain => 0.0,
            ParameterId::PeakQuality => 1.0,
            ParameterId::LowCutSlope | ParameterId::HighCutSlope => 0.0,
            ParameterId::AnalyzerEnabled => 1.0,
            _ => 0.0,
        }
    }

    /// Choice labels for choice parameters; empty otherwise.
    pub fn choices(self) -> Vec<&'static str> {
        match self.kind() {
            ParameterKind::Choice => Slope::ALL.iter().map(|slope| slope.label()).collect(),
            _ => Vec::new(),
        }
    }
}

/// Continuous parameter range with step quantisation and skew.
///
/// A skew below 1.0 spends more of the normalised travel on the low end of
/// the range, which is what the frequency knobs use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterRange {
    pub start: f32,
    pub end: f32,
    pub interval: f32,
    pub skew: f32,
}

impl ParameterRange {
    pub fn new(start: f32, end: f32, interval: f32, skew: f32) -> Self {
        Self {
            start,
            end,
            interval,
            skew,
        }
    }

    /// Map a normalised `0..=1` host value onto the plain range.
    pub fn convert_from_0_to_1(&self, proportion: f32) -> f32 {
        let mut proportion = proportion.clamp(0.0, 1.0);
        if self.skew != 1.0 && proportion > 0.0 {
            proportion = (proportion.ln() / self.skew).exp();
        }
        self.start + (self.end - self.start) * proportion
    }

    /// Map a plain value onto the normalised `0..=1` host range.
    pub fn convert_to_0_to_1(&self, value: f32) -> f32 {
        let proportion = ((value - self.start) / (self.end - self.start)).clamp(0.0, 1.0);
        if self.skew == 1.0 {
            return proportion;
        }
        proportion.powf(self.skew)
    }

    /// Quantise to the interval grid and clamp into the range.
    pub fn snap_to_legal_value(&self, value: f32) -> f32 {
        let mut value = value;
        if self.interval > 0.0 {
            let start = f64::from(self.start);
            let interval = f64::from(self.interval);
            let steps = ((f64::from(value) - start) / interval + 0.5).floor();
            value = (start + interval * steps) as f32;
        }
        value.clamp(self.start, self.end)
    }
}
