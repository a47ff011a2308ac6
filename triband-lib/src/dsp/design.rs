//! Coefficient calculator for the three EQ stages.
//!
//! Pure functions of a [`ChainSettings`] snapshot and a sample rate. Nothing
//! here clamps: frequencies must already sit below Nyquist and Q above zero
//! (see [`ChainSettings::sanitized`]). None of these allocate, so they are safe
//! to call from the audio callback.

use std::f64::consts::PI;

use super::biquad::BiquadCoefficients;
use super::scale::decibels_to_gain;
use crate::constants::MAX_CUT_SECTIONS;
use crate::params::{ChainSettings, Slope};

/// Up to four cascaded sections realising one Butterworth cut.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CutCoefficients {
    sections: [BiquadCoefficients; MAX_CUT_SECTIONS],
    len: usize,
}

impl CutCoefficients {
    pub fn as_slice(&self) -> &[BiquadCoefficients] {
        &self.sections[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, section: usize) -> Option<&BiquadCoefficients> {
        self.as_slice().get(section)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BiquadCoefficients> {
        self.as_slice().iter()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CutKind {
    HighPass,
    LowPass,
}

/// Peaking EQ section centred on `peak_freq`.
pub fn make_peak_filter(settings: &ChainSettings, sample_rate: f64) -> BiquadCoefficients {
    peak_coefficients(
        settings.peak_freq as f64,
        settings.peak_quality as f64,
        decibels_to_gain(settings.peak_gain_db as f64),
        sample_rate,
    )
}

/// Butterworth high-pass at `low_cut_freq`, one section per slope step.
pub fn make_low_cut_filter(settings: &ChainSettings, sample_rate: f64) -> CutCoefficients {
    butterworth_cut(
        CutKind::HighPass,
        settings.low_cut_freq as f64,
        settings.low_cut_slope,
        sample_rate,
    )
}

/// Butterworth low-pass at `high_cut_freq`, one section per slope step.
pub fn make_high_cut_filter(settings: &ChainSettings, sample_rate: f64) -> CutCoefficients {
    butterworth_cut(
        CutKind::LowPass,
        settings.high_cut_freq as f64,
        settings.high_cut_slope,
        sample_rate,
    )
}

/// Q of section `index` in a Butterworth cascade of even `order`.
///
/// The pole pairs of an order-`n` Butterworth prototype sit at angles
/// `(2k + 1)π / 2n`; each pair becomes one section with `Q = 1 / (2 cos θ)`.
pub fn butterworth_section_q(order: usize, index: usize) -> f64 {
    let theta = (2 * index + 1) as f64 * PI / (2 * order) as f64;
    1.0 / (2.0 * theta.cos())
}

fn butterworth_cut(kind: CutKind, freq_hz: f64, slope: Slope, sample_rate: f64) -> CutCoefficients {
    let order = slope.order();
    let mut sections = [BiquadCoefficients::IDENTITY; MAX_CUT_SECTIONS];
    for (index, section) in sections.iter_mut().take(slope.sections()).enumerate() {
        let q = butterworth_section_q(order, index);
        *section = match kind {
            CutKind::HighPass => high_pass_coefficients(freq_hz, q, sample_rate),
            CutKind::LowPass => low_pass_coefficients(freq_hz, q, sample_rate),
        };
    }

    CutCoefficients {
        sections,
        len: slope.sections(),
    }
}

fn peak_coefficients(freq_hz: f64, q: f64, gain: f64, sample_rate: f64) -> BiquadCoefficients {
    let w0 = 2.0 * PI * freq_hz / sample_rate;
    let cos_w0 = w0.cos();
    let alpha = w0.sin() / (2.0 * q);
    let amplitude = gain.sqrt();

    let b0 = 1.0 + alpha * amplitude;
    let b1 = -2.0 * cos_w0;
    let b2 = 1.0 - alpha * amplitude;
    let a0 = 1.0 + alpha / amplitude;
    let a1 = -2.0 * cos_w0;
    let a2 = 1.0 - alpha / amplitude;

    BiquadCoefficients::normalized(b0, b1, b2, a0, a1, a2)
}

fn low_pass_coefficients(freq_hz: f64, q: f64, sample_rate: f64) -> BiquadCoefficients {
    let w0 = 2.0 * PI * freq_hz / sample_rate;
    let cos_w0 = w0.cos();
    let alpha = w0.sin() / (2.0 * q);

    let b1 = 1.0 - cos_w0;
    let b0 = b1 / 2.0;
    let b2 = b0;
    let a0 = 1.0 + alpha;
    let a1 = -2.0 * cos_w0;
    let a2 = 1.0 - alpha;

    BiquadCoefficients::normalized(b0, b1, b2, a0, a1, a2)
}

fn high_pass_coefficients(freq_hz: f64, q: f64, sample_rate: f64) -> BiquadCoefficients {
    let w0 = 2.0 * PI * freq_hz / sample_rate;
    let cos_w0 = w0.cos();
    let alpha = w0.sin() / (2.0 * q);

    let b0 = (1.0 + cos_w0) / 2.0;
    let b1 = -1.0 - cos_w0;
    let b2 = b0;
    let a0 = 1.0 + alpha;
    let a1 = -2.0 * cos_w0;
    let a2 = 1.0 - alpha;

    BiquadCoefficients::normalized(b0, b1, b2, a0, a1, a2)
}
