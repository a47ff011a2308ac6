use std::fmt::{Display, Formatter};

/// Error type for saving and restoring opaque parameter state.
#[derive(Debug)]
pub enum StateError {
    Encode(serde_json::Error),
    Decode(serde_json::Error),
}

impl Display for StateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode(err) => write!(f, "state encode error: {}", err),
            Self::Decode(err) => write!(f, "state decode error: {}", err),
        }
    }
}

impl std::error::Error for StateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Encode(err) | Self::Decode(err) => Some(err),
        }
    }
}

/// Error type for processor and analyzer setup.
///
/// Only setup paths return this; block processing and UI ticks never fail.
#[derive(Debug)]
pub enum EqError {
    InvalidSampleRate(f64),
    InvalidBlockSize(usize),
    InvalidCapacity(usize),
    InvalidFftOrder(usize),
    State(StateError),
}

impl Display for EqError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSampleRate(rate) => write!(f, "invalid sample rate: {}", rate),
            Self::InvalidBlockSize(size) => write!(f, "invalid block size: {}", size),
            Self::InvalidCapacity(capacity) => write!(f, "invalid fifo capacity: {}", capacity),
            Self::InvalidFftOrder(order) => {
                write!(f, "unsupported fft order: {} (expected 11, 12 or 13)", order)
            }
            Self::State(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for EqError {}

impl From<StateError> for EqError {
    fn from(value: StateError) -> Self {
        Self::State(value)
    }
}
