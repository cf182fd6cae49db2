//! Connecting an object detector to the tracker.
//!
//! Inference itself stays outside this crate: implement [`DetectionSource`] for
//! the backend and hand it to a [`TrackerPipeline`].

mod builder;
mod detector;
mod pipeline;

pub use builder::DetectionBuilder;
pub use detector::{DetectionSource, IntoDetections, NpuDetection};
pub use pipeline::TrackerPipeline;
