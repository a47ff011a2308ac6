//! Spectrum analysis and response display: FFT frames, log-frequency paths,
//! the analytic response curve and the per-channel UI pipeline.

pub mod channel;
pub mod config;
pub mod path;
pub mod response;
pub mod spectrum;
pub mod window;

pub use channel::ChannelAnalyzer;
pub use config::{AnalyzerConfig, FftOrder};
pub use path::{DisplayPath, PathGenerator, Point, Rect};
pub use response::{CurveState, ResponseCurve};
pub use spectrum::SpectrumAnalyzer;
