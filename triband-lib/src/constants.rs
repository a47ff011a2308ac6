//! Shared constants for DSP, analysis and display defaults.

/// Lowest frequency shown on the analyzer and accepted by the parameter layout (Hz).
pub const MIN_FREQ_HZ: f64 = 20.0;

/// Highest frequency shown on the analyzer and accepted by the parameter layout (Hz).
pub const MAX_FREQ_HZ: f64 = 20_000.0;

/// Number of channels handled by the processor.
pub const NUM_CHANNELS: usize = 2;

/// Maximum number of 2nd-order sections in a cut stage (48 dB/oct).
pub const MAX_CUT_SECTIONS: usize = 4;

/// Number of blocks/frames/paths each analysis FIFO can hold.
pub const FIFO_CAPACITY: usize = 30;

/// Floor used by the live spectrum analyzer (dB).
///
/// Magnitudes below this, and any non-finite value, are reported as the floor.
pub const ANALYZER_FLOOR_DB: f32 = -48.0;

/// Every n-th FFT bin is plotted in a spectrum path.
pub const PATH_STRIDE: usize = 2;

/// Vertical range of the response-curve display (±dB).
pub const RESPONSE_RANGE_DB: f64 = 24.0;

/// UI refresh cadence the analyzer view is designed around.
pub const UI_REFRESH_HZ: u32 = 60;

/// Fallback sample rate used before the host has prepared the processor.
pub const DEFAULT_SAMPLE_RATE: f64 = 48_000.0;

/// Floor applied when the response tracer converts a magnitude to dB.
pub const RESPONSE_FLOOR_DB: f64 = -100.0;

/// Frequencies marked by vertical grid lines on the analyzer (Hz).
pub const GRID_FREQUENCIES_HZ: [f64; 10] = [
    20.0, 50.0, 100.0, 200.0, 500.0, 1_000.0, 2_000.0, 5_000.0, 10_000.0, 20_000.0,
];

/// Gains marked by horizontal grid lines on the response display (dB).
pub const GRID_GAINS_DB: [f64; 5] = [-24.0, -12.0, 0.0, 12.0, 24.0];
