//! DSP components: biquad sections, coefficient design, the per-channel
//! filter chain and dB/log-frequency scaling helpers.

pub mod biquad;
pub mod chain;
pub mod design;
pub mod scale;
