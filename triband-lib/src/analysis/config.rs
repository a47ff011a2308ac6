//! Analyzer tuning, loadable from JSON.

use serde::{Deserialize, Serialize};

use crate::constants::{ANALYZER_FLOOR_DB, FIFO_CAPACITY, PATH_STRIDE};
use crate::error::EqError;

/// Supported FFT sizes, stored as their base-2 order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub enum FftOrder {
    #[default]
    Order2048 = 11,
    Order4096 = 12,
    Order8192 = 13,
}

impl FftOrder {
    pub fn from_order(order: usize) -> Result<Self, EqError> {
        match order {
            11 => Ok(Self::Order2048),
            12 => Ok(Self::Order4096),
            13 => Ok(Self::Order8192),
            other => Err(EqError::InvalidFftOrder(other)),
        }
    }

    pub fn order(self) -> usize {
        self as usize
    }

    pub fn fft_size(self) -> usize {
        1 << self.order()
    }

    /// Number of dB values in one spectral frame.
    pub fn bins(self) -> usize {
        self.fft_size() / 2
    }
}

impl TryFrom<usize> for FftOrder {
    type Error = EqError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::from_order(value)
    }
}

impl From<FftOrder> for usize {
    fn from(value: FftOrder) -> Self {
        value.order()
    }
}

/// Analyzer settings shared by both channels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    #[serde(alias = "order")]
    pub fft_order: FftOrder,
    /// Lowest displayed level; quieter bins clamp here.
    #[serde(alias = "floor", alias = "negative_infinity_db")]
    pub floor_db: f32,
    /// Bin step between emitted path points.
    #[serde(alias = "stride")]
    pub path_stride: usize,
    /// Capacity of every analyzer FIFO, in blocks/frames/paths.
    #[serde(alias = "capacity")]
    pub fifo_capacity: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            fft_order: FftOrder::default(),
            floor_db: ANALYZER_FLOOR_DB,
            path_stride: PATH_STRIDE,
            fifo_capacity: FIFO_CAPACITY,
        }
    }
}

impl AnalyzerConfig {
    /// Copy with out-of-domain fields replaced by their defaults.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        Self {
            fft_order: self.fft_order,
            floor_db: if self.floor_db.is_finite() && self.floor_db < 0.0 {
                self.floor_db
            } else {
                defaults.floor_db
            },
            path_stride: if self.path_stride == 0 {
                defaults.path_stride
            } else {
                self.path_stride
            },
            fifo_capacity: if self.fifo_capacity == 0 {
                defaults.fifo_capacity
            } else {
                self.fifo_capacity
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fft_orders_map_to_sizes() {
        assert_eq!(FftOrder::Order2048.fft_size(), 2048);
        assert_eq!(FftOrder::Order8192.bins(), 4096);
        assert!(matches!(
            FftOrder::from_order(10),
            Err(EqError::InvalidFftOrder(10))
        ));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: AnalyzerConfig =
            serde_json::from_str(r#"{"order": 12, "stride": 4}"#).expect("config");
        assert_eq!(config.fft_order, FftOrder::Order4096);
        assert_eq!(config.path_stride, 4);
        assert_eq!(config.floor_db, ANALYZER_FLOOR_DB);
        assert_eq!(config.fifo_capacity, FIFO_CAPACITY);
    }

    #[test]
    fn unsupported_order_is_a_decode_error() {
        assert!(serde_json::from_str::<AnalyzerConfig>(r#"{"fft_order": 9}"#).is_err());
    }

    #[test]
    fn sanitized_repairs_degenerate_fields() {
        let config = AnalyzerConfig {
            floor_db: 6.0,
            path_stride: 0,
            fifo_capacity: 0,
            ..AnalyzerConfig::default()
        }
        .sanitized();
        assert_eq!(config, AnalyzerConfig::default());
    }

    #[test]
    fn sanitized_keeps_valid_stride() {
        let config = AnalyzerConfig {
            path_stride: 1,
            ..AnalyzerConfig::default()
        }
        .sanitized();
        assert_eq!(config.path_stride, 1);
        assert_eq!(
            AnalyzerConfig {
                path_stride: 0,
                ..AnalyzerConfig::default()
            }
            .sanitized()
            .path_stride,
            PATH_STRIDE
        );
    }
}
