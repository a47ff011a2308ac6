//! Analytic frequency response of the EQ, traced per display pixel.

use log::debug;

use super::path::{frequency_to_x, DisplayPath, Rect};
use crate::constants::{
    GRID_FREQUENCIES_HZ, GRID_GAINS_DB, MAX_FREQ_HZ, MIN_FREQ_HZ, RESPONSE_FLOOR_DB,
    RESPONSE_RANGE_DB,
};
use crate::dsp::chain::{ChainPosition, FilterChain};
use crate::dsp::scale::{gain_to_decibels, map_to_log10, remap};
use crate::params::{ChainSettings, SharedParameters};

/// Linear magnitude of the whole chain at `freq`.
///
/// A bypassed stage or section multiplies by 1.0, which is what the audio path
/// gets by skipping it.
pub fn combined_magnitude(chain: &FilterChain, freq: f64, sample_rate: f64) -> f64 {
    let mut magnitude = 1.0;
    for position in ChainPosition::ALL {
        if chain.is_bypassed(position) {
            continue;
        }
        for section in 0..position.section_slots() {
            if !chain.is_section_bypassed(position, section) {
                magnitude *= chain.magnitude_at(position, section, freq, sample_rate);
            }
        }
    }
    magnitude
}

/// `(pixel, dB)` for each of `width` pixels, pixel `i` sitting at
/// `20 * 1000^(i / width)` Hz.
pub fn trace(chain: &FilterChain, width: usize, sample_rate: f64) -> Vec<(usize, f64)> {
    (0..width)
        .map(|pixel| {
            let freq = map_to_log10(pixel as f64 / width as f64, MIN_FREQ_HZ, MAX_FREQ_HZ);
            let magnitude = combined_magnitude(chain, freq, sample_rate);
            (pixel, gain_to_decibels(magnitude, RESPONSE_FLOOR_DB))
        })
        .collect()
}

/// y of `gain_db` on the ±24 dB response scale.
pub fn gain_to_y(gain_db: f64, bounds: &Rect) -> f32 {
    remap(
        gain_db,
        -RESPONSE_RANGE_DB,
        RESPONSE_RANGE_DB,
        bounds.bottom() as f64,
        bounds.top() as f64,
    ) as f32
}

/// x of every vertical grid line.
pub fn grid_x_positions(bounds: &Rect) -> Vec<(f64, f32)> {
    GRID_FREQUENCIES_HZ
        .iter()
        .map(|freq| (*freq, frequency_to_x(*freq, bounds)))
        .collect()
}

/// y of every horizontal gain line.
pub fn grid_y_positions(bounds: &Rect) -> Vec<(f64, f32)> {
    GRID_GAINS_DB
        .iter()
        .map(|gain| (*gain, gain_to_y(*gain, bounds)))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveState {
    Idle,
    Recomputing,
}

/// Response overlay with its own filter chain.
///
/// The chain is never shared with the audio path; it is refreshed from a
/// parameter snapshot and only ever evaluated analytically.
#[derive(Debug, Clone)]
pub struct ResponseCurve {
    chain: FilterChain,
    curve: Vec<(usize, f64)>,
    width: usize,
    sample_rate: f64,
    state: CurveState,
    recomputes: u64,
}

impl ResponseCurve {
    pub fn new(width: usize, sample_rate: f64) -> Self {
        Self {
            chain: FilterChain::new(),
            curve: Vec::new(),
            width,
            sample_rate,
            state: CurveState::Idle,
            recomputes: 0,
        }
    }

    /// Recompute if the UI-side change flag was raised since the last poll.
    ///
    /// Any number of parameter changes between two polls cause exactly one
    /// recompute.
    pub fn poll(&mut self, params: &SharedParameters) -> bool {
        if !params.take_ui_change() {
            return false;
        }
        self.refresh(&params.snapshot());
        true
    }

    /// Rebuild the chain from `settings` and retrace every pixel.
    pub fn refresh(&mut self, settings: &ChainSettings) {
        self.state = CurveState::Recomputing;
        self.chain
            .update_from_settings(&settings.sanitized(self.sample_rate), self.sample_rate);
        self.retrace();
        self.state = CurveState::Idle;
    }

    pub fn set_width(&mut self, width: usize) {
        if width != self.width {
            self.width = width;
            self.retrace();
        }
    }

    /// Switch to `sample_rate`, redesigning the chain from `settings` and
    /// retracing every pixel.
    pub fn set_sample_rate(&mut self, sample_rate: f64, settings: &ChainSettings) {
        self.sample_rate = sample_rate;
        self.refresh(settings);
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn curve(&self) -> &[(usize, f64)] {
        &self.curve
    }

    pub fn chain(&self) -> &FilterChain {
        &self.chain
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Lifecycle marker. `Recomputing` only holds inside [`ResponseCurve::refresh`],
    /// so callers always read `Idle`.
    pub fn state(&self) -> CurveState {
        self.state
    }

    /// How many times the curve was traced.
    pub fn recomputes(&self) -> u64 {
        self.recomputes
    }

    /// The traced curve as a polyline on the ±24 dB scale inside `bounds`.
    pub fn response_path(&self, bounds: &Rect) -> DisplayPath {
        let mut path = DisplayPath::with_capacity(self.curve.len());
        for (pixel, db) in &self.curve {
            path.push(bounds.left() + *pixel as f32, gain_to_y(*db, bounds));
        }
        path
    }

    fn retrace(&mut self) {
        self.curve = trace(&self.chain, self.width, self.sample_rate);
        self.recomputes += 1;
        debug!(
            "response curve traced: {} px at {} Hz",
            self.width, self.sample_rate
        );
    }
}
