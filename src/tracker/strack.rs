//! Single object track (STrack) and its caller-facing snapshot.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::error::FilterError;
use crate::tracker::detection::Detection;
use crate::tracker::kalman_filter::{self, KalmanFilter};
use crate::tracker::matching::TrackGeometry;
use crate::tracker::rect::Rect;
use crate::tracker::track_state::TrackState;

/// Single object track.
///
/// The box is never stored: [`STrack::rect`] derives it from the Kalman mean.
#[derive(Debug, Clone)]
pub struct STrack {
    /// Unique within the owning tracker, never reused. Allocated when the
    /// track is born, so tracks that die unconfirmed leave gaps in the ids
    /// callers see.
    pub track_id: u64,
    pub state: TrackState,
    /// Confidence of the last matched detection
    pub score: f32,
    pub label: i32,
    pub name: Option<String>,
    /// Frame of the last successful update
    pub frame_id: u64,
    pub start_frame: u64,
    /// Number of matched frames since birth
    pub tracklet_len: u32,
    mean: Array1<f64>,
    covariance: Array2<f64>,
}

impl STrack {
    /// Start a track from an unmatched detection.
    ///
    /// The detection must be valid (see [`Detection::is_valid`]). `confirmed`
    /// tracks start as `Tracked`, others as `New`.
    pub fn new(
        detection: &Detection,
        kalman_filter: &KalmanFilter,
        track_id: u64,
        frame_id: u64,
        confirmed: bool,
    ) -> Self {
        let (mean, covariance) = kalman_filter.initiate(measurement(&detection.bbox));
        Self {
            track_id,
            state: if confirmed {
                TrackState::Tracked
            } else {
                TrackState::New
            },
            score: detection.score,
            label: detection.label,
            name: detection.name.clone(),
            frame_id,
            start_frame: frame_id,
            tracklet_len: 0,
            mean,
            covariance,
        }
    }

    /// Current box in TLWH format.
    pub fn rect(&self) -> Rect {
        Rect::from_xyah(
            self.mean[0] as f32,
            self.mean[1] as f32,
            self.mean[2] as f32,
            self.mean[3] as f32,
        )
    }

    /// Center velocity in pixels per frame.
    pub fn velocity(&self) -> (f32, f32) {
        (self.mean[4] as f32, self.mean[5] as f32)
    }

    pub fn geometry(&self) -> TrackGeometry {
        TrackGeometry {
            rect: self.rect(),
            velocity: self.velocity(),
        }
    }

    pub fn mean(&self) -> &Array1<f64> {
        &self.mean
    }

    pub fn covariance(&self) -> &Array2<f64> {
        &self.covariance
    }

    #[cfg(test)]
    pub(crate) fn covariance_mut(&mut self) -> &mut Array2<f64> {
        &mut self.covariance
    }

    pub fn end_frame(&self) -> u64 {
        self.frame_id
    }

    /// Confirmed tracks have been matched at least once after birth, or were
    /// born on the first frame of the stream.
    pub fn is_confirmed(&self) -> bool {
        self.state != TrackState::New
    }

    /// Whether the filter state is still usable.
    pub fn is_finite(&self) -> bool {
        kalman_filter::is_finite(&self.mean, &self.covariance)
    }

    /// Advance the motion model by `frames` frames (at least one). Tracks that
    /// are not currently tracked do not keep growing or shrinking.
    pub fn predict(&mut self, kalman_filter: &KalmanFilter, frames: u64) {
        if self.state != TrackState::Tracked {
            self.mean[7] = 0.0;
        }
        let (mean, covariance) = if frames > 1 {
            kalman_filter.predict_step(&self.mean, &self.covariance, frames as f64)
        } else {
            kalman_filter.predict(&self.mean, &self.covariance)
        };
        self.mean = mean;
        self.covariance = covariance;
    }

    /// Correct the track with a matched detection.
    ///
    /// Covers confirmation of `New` tracks and re-acquisition of `Lost` ones.
    /// On a filter error the track is left untouched.
    pub fn update(
        &mut self,
        detection: &Detection,
        kalman_filter: &KalmanFilter,
        frame_id: u64,
    ) -> Result<(), FilterError> {
        let (mean, covariance) =
            kalman_filter.update(&self.mean, &self.covariance, measurement(&detection.bbox))?;
        self.mean = mean;
        self.covariance = covariance;

        self.state = TrackState::Tracked;
        self.frame_id = frame_id;
        self.tracklet_len += 1;
        self.score = detection.score;
        self.label = detection.label;
        if detection.name.is_some() {
            self.name.clone_from(&detection.name);
        }
        Ok(())
    }

    pub fn mark_lost(&mut self) {
        self.state = TrackState::Lost;
    }

    pub fn mark_removed(&mut self) {
        self.state = TrackState::Removed;
    }

    /// Owned copy of the fields a caller may keep across frames.
    pub fn to_result(&self) -> TrackResult {
        TrackResult {
            track_id: self.track_id,
            rect: self.rect(),
            label: self.label,
            name: self.name.clone(),
            score: self.score,
            state: self.state,
            frame_id: self.frame_id,
            start_frame: self.start_frame,
            tracklet_len: self.tracklet_len,
        }
    }
}

fn measurement(rect: &Rect) -> [f64; 4] {
    rect.to_xyah().map(f64::from)
}

/// Per-frame output for one track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackResult {
    pub track_id: u64,
    pub rect: Rect,
    pub label: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub score: f32,
    pub state: TrackState,
    pub frame_id: u64,
    pub start_frame: u64,
    pub tracklet_len: u32,
}
