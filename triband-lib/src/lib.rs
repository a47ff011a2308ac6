//! # Triband EQ Library
//!
//! Real-time core of a three-band equalizer (low-cut, peak, high-cut) with a
//! live spectrum analyzer. It includes modules for filter design, per-channel
//! processing, lock-free audio-to-UI transport and display data generation.
//!
//! The audio callback owns an [`EqProcessor`]; the UI owns an
//! [`AnalyzerView`] fed through the FIFOs returned by
//! [`EqProcessor::prepare`]. Both read parameters from one
//! [`params::SharedParameters`] store.

pub mod analysis;
pub mod audio;
pub mod constants;
#[cfg(feature = "bench")]
pub mod diagnostics;
pub mod dsp;
pub mod error;
pub mod params;
pub mod processor;
pub mod view;

pub use error::{EqError, StateError};
pub use params::{ChainSettings, ParameterId, SharedParameters, Slope};
pub use processor::{AnalyzerTaps, Channel, EqProcessor};
pub use view::{AnalyzerView, TickOutcome};
