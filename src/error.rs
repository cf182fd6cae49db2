//! Error types.

use thiserror::Error;

/// Rejected tracker configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrackerError {
    #[error("threshold `{name}` must lie in [0, 1], got {value}")]
    ThresholdOutOfRange { name: &'static str, value: f32 },

    #[error("track_thresh ({low}) must not exceed high_thresh ({high})")]
    ThresholdOrder { low: f32, high: f32 },

    #[error("frame rate must be positive and finite, got {0}")]
    InvalidFrameRate(f32),

    #[error("noise weight `{name}` must be positive and finite, got {value}")]
    InvalidNoiseWeight { name: &'static str, value: f64 },
}

/// Numeric failure inside the Kalman filter.
///
/// Confined to the track that produced it; the tracker removes that track and
/// carries on with the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("innovation covariance is not positive definite")]
    NotPositiveDefinite,

    #[error("filter state contains non-finite values")]
    NonFinite,
}
