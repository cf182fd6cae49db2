//! TrackerPipeline for combining detection with tracking.

use crate::error::TrackerError;
use crate::tracker::{BYTETracker, TrackResult, TrackerConfig};

use super::DetectionSource;

/// One detector feeding one tracker.
///
/// The pipeline is the single consumer for a stream: frames go through
/// detection and then tracking strictly one at a time. Streams coming from
/// several capture threads should be funnelled into one pipeline per stream.
pub struct TrackerPipeline<D: DetectionSource> {
    detector: D,
    tracker: BYTETracker,
}

impl<D: DetectionSource> TrackerPipeline<D> {
    pub fn new(detector: D, config: TrackerConfig) -> Result<Self, TrackerError> {
        Ok(Self {
            detector,
            tracker: BYTETracker::new(config)?,
        })
    }

    pub fn with_default_config(detector: D) -> Self {
        Self {
            detector,
            tracker: BYTETracker::default(),
        }
    }

    /// Detect and track the next frame.
    ///
    /// A detector error leaves the tracker untouched, so the frame is simply
    /// skipped from the tracker's point of view.
    pub fn process_frame(
        &mut self,
        frame: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Vec<TrackResult>, D::Error> {
        let detections = self.detector.detect(frame, width, height)?;
        Ok(self.tracker.update(detections))
    }

    /// Like [`process_frame`](Self::process_frame) with the capture's own frame
    /// index, so dropped frames still count toward track aging.
    pub fn process_frame_at(
        &mut self,
        frame: &[u8],
        width: u32,
        height: u32,
        frame_index: u64,
    ) -> Result<Vec<TrackResult>, D::Error> {
        let detections = self.detector.detect(frame, width, height)?;
        Ok(self.tracker.update_at(detections, frame_index))
    }

    pub fn detector(&self) -> &D {
        &self.detector
    }

    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }

    pub fn tracker(&self) -> &BYTETracker {
        &self.tracker
    }
}
