//! ByteTrack multi-object tracking for embedded detection pipelines.
//!
//! The [`tracker`] module holds the tracking core: geometry, the Kalman motion
//! filter, IoU association with a rectangular LAPJV solver and the per-frame
//! [`BYTETracker`] orchestrator. The [`integration`] module connects an external
//! detector (e.g. an NPU inference call) to a tracker.

pub mod error;
pub mod integration;
pub mod tracker;

pub use error::{FilterError, TrackerError};
pub use integration::{
    DetectionBuilder, DetectionSource, IntoDetections, NpuDetection, TrackerPipeline,
};
pub use tracker::{
    AssociationWeights, BYTETracker, Detection, Rect, TrackResult, TrackState, TrackerConfig,
};
