//! Main BYTETracker algorithm implementation.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::error::TrackerError;
use crate::tracker::arena::{TrackArena, TrackSlot};
use crate::tracker::detection::Detection;
use crate::tracker::kalman_filter::{KalmanFilter, STD_WEIGHT_POSITION, STD_WEIGHT_VELOCITY};
use crate::tracker::matching::{self, AssignmentResult, AssociationWeights, TrackGeometry};
use crate::tracker::rect::{Rect, iou_batch};
use crate::tracker::strack::{STrack, TrackResult};

/// Configuration for the BYTETracker.
///
/// Association thresholds are upper bounds on the matching cost (`1 - IoU` by
/// default): a smaller value is stricter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Detections at or above this score may match confirmed and lost tracks
    /// and may start new tracks.
    pub high_thresh: f32,
    /// Detections below this score are discarded. Those between `track_thresh`
    /// and `high_thresh` can only extend tracks that are already tracked.
    pub track_thresh: f32,
    /// Tracked tracks vs. high-score detections.
    pub match_thresh: f32,
    /// Lost tracks vs. leftover high-score detections.
    pub lost_match_thresh: f32,
    /// Still-unmatched tracked tracks vs. low-score detections.
    pub low_match_thresh: f32,
    /// Unconfirmed tracks vs. remaining high-score detections.
    pub unconfirmed_match_thresh: f32,
    /// Tracked/lost pairs overlapping more than this are duplicates.
    pub duplicate_iou_thresh: f32,
    /// Lost-track buffer in frames at 30 fps.
    pub track_buffer: u32,
    pub frame_rate: f32,
    /// Blend detection scores into the high-score association costs.
    pub fuse_score: bool,
    pub weights: AssociationWeights,
    pub std_weight_position: f64,
    pub std_weight_velocity: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            high_thresh: 0.5,
            track_thresh: 0.1,
            match_thresh: 0.8,
            lost_match_thresh: 0.7,
            low_match_thresh: 0.85,
            unconfirmed_match_thresh: 0.7,
            duplicate_iou_thresh: 0.85,
            track_buffer: 30,
            frame_rate: 30.0,
            fuse_score: false,
            weights: AssociationWeights::default(),
            std_weight_position: STD_WEIGHT_POSITION,
            std_weight_velocity: STD_WEIGHT_VELOCITY,
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> Result<(), TrackerError> {
        let unit = [
            ("high_thresh", self.high_thresh),
            ("track_thresh", self.track_thresh),
            ("match_thresh", self.match_thresh),
            ("lost_match_thresh", self.lost_match_thresh),
            ("low_match_thresh", self.low_match_thresh),
            ("unconfirmed_match_thresh", self.unconfirmed_match_thresh),
            ("duplicate_iou_thresh", self.duplicate_iou_thresh),
            ("weights.posture", self.weights.posture),
            ("weights.speed", self.weights.speed),
            ("weights.lineness", self.weights.lineness),
        ];
        for (name, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(TrackerError::ThresholdOutOfRange { name, value });
            }
        }
        if self.track_thresh > self.high_thresh {
            return Err(TrackerError::ThresholdOrder {
                low: self.track_thresh,
                high: self.high_thresh,
            });
        }
        if !(self.frame_rate.is_finite() && self.frame_rate > 0.0) {
            return Err(TrackerError::InvalidFrameRate(self.frame_rate));
        }
        let noise = [
            ("std_weight_position", self.std_weight_position),
            ("std_weight_velocity", self.std_weight_velocity),
        ];
        for (name, value) in noise {
            if !(value.is_finite() && value > 0.0) {
                return Err(TrackerError::InvalidNoiseWeight { name, value });
            }
        }
        Ok(())
    }

    /// Frames a lost track is kept before removal.
    pub fn max_time_lost(&self) -> u64 {
        (self.frame_rate / 30.0 * self.track_buffer as f32) as u64
    }
}

/// Multi-object tracker for one video stream.
///
/// All tracks live in one arena; the tracked and lost partitions are lists of
/// slots into it. Callers only ever receive owned [`TrackResult`] snapshots.
#[derive(Debug, Clone)]
pub struct BYTETracker {
    arena: TrackArena,
    /// Confirmed and unconfirmed tracks
    tracked: Vec<TrackSlot>,
    lost: Vec<TrackSlot>,
    /// Identities removed during the latest update
    removed: Vec<u64>,
    frame_id: u64,
    frame_count: u64,
    next_id: u64,
    config: TrackerConfig,
    max_time_lost: u64,
    kalman_filter: KalmanFilter,
}

impl Default for BYTETracker {
    fn default() -> Self {
        Self::from_valid_config(TrackerConfig::default())
    }
}

impl BYTETracker {
    pub fn new(config: TrackerConfig) -> Result<Self, TrackerError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    /// Default thresholds with the given stream rate and lost-track buffer.
    pub fn with_frame_rate(frame_rate: u32, track_buffer: u32) -> Result<Self, TrackerError> {
        Self::new(TrackerConfig {
            frame_rate: frame_rate as f32,
            track_buffer,
            ..TrackerConfig::default()
        })
    }

    fn from_valid_config(config: TrackerConfig) -> Self {
        let max_time_lost = config.max_time_lost();
        let kalman_filter = KalmanFilter::new(config.std_weight_position, config.std_weight_velocity);
        Self {
            arena: TrackArena::new(),
            tracked: Vec::new(),
            lost: Vec::new(),
            removed: Vec::new(),
            frame_id: 0,
            frame_count: 0,
            next_id: 0,
            config,
            max_time_lost,
            kalman_filter,
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Index of the last processed frame.
    pub fn frame_id(&self) -> u64 {
        self.frame_id
    }

    pub fn max_time_lost(&self) -> u64 {
        self.max_time_lost
    }

    /// Tracked tracks, including unconfirmed ones.
    pub fn tracked_tracks(&self) -> impl Iterator<Item = &STrack> {
        self.arena.resolve(&self.tracked)
    }

    pub fn lost_tracks(&self) -> impl Iterator<Item = &STrack> {
        self.arena.resolve(&self.lost)
    }

    /// Identities removed during the latest update. They never come back.
    pub fn removed_track_ids(&self) -> &[u64] {
        &self.removed
    }

    /// Process the next frame; its index is one past the previous frame.
    pub fn update(&mut self, detections: Vec<Detection>) -> Vec<TrackResult> {
        self.step(detections, self.frame_id.saturating_add(1))
    }

    /// Process a frame with an explicit index.
    ///
    /// Indices may skip but must increase; a stale index is replaced by the
    /// previous index plus one.
    pub fn update_at(&mut self, detections: Vec<Detection>, frame_index: u64) -> Vec<TrackResult> {
        let frame_index = if self.frame_count > 0 && frame_index <= self.frame_id {
            warn!(
                frame_index,
                last = self.frame_id,
                "frame index did not increase, using the next index"
            );
            self.frame_id.saturating_add(1)
        } else {
            frame_index
        };
        self.step(detections, frame_index)
    }

    fn step(&mut self, detections: Vec<Detection>, frame_id: u64) -> Vec<TrackResult> {
        let elapsed = frame_id.saturating_sub(self.frame_id).max(1);
        self.frame_id = frame_id;
        self.frame_count += 1;
        self.removed.clear();

        // Step 1: Split detections into high-score and low-score
        let mut detections_high = Vec::new();
        let mut detections_low = Vec::new();
        for det in detections {
            if !det.is_valid() {
                trace!(bbox = ?det.bbox, score = det.score, "dropping malformed detection");
            } else if det.score >= self.config.high_thresh {
                detections_high.push(det);
            } else if det.score >= self.config.track_thresh {
                detections_low.push(det);
            }
        }

        let (confirmed, unconfirmed): (Vec<TrackSlot>, Vec<TrackSlot>) = std::mem::take(&mut self.tracked)
            .into_iter()
            .partition(|&slot| self.arena[slot].is_confirmed());
        let lost = std::mem::take(&mut self.lost);

        // Step 2: Predict every surviving track over the frames since the last update
        let confirmed = self.predict(confirmed, elapsed);
        let unconfirmed = self.predict(unconfirmed, elapsed);
        let lost = self.predict(lost, elapsed);

        let mut activated = Vec::new();
        let mut still_lost = Vec::new();

        // Step 3: First association, tracked tracks with high score detections
        let high: Vec<&Detection> = detections_high.iter().collect();
        let AssignmentResult {
            matches,
            unmatched_tracks,
            unmatched_detections,
        } = self.associate(&confirmed, &high, self.config.match_thresh, self.config.fuse_score);

        for (itracked, idet) in matches {
            self.apply_match(confirmed[itracked], high[idet], &mut activated);
        }
        let r_tracked: Vec<TrackSlot> = unmatched_tracks.iter().map(|&i| confirmed[i]).collect();
        let high: Vec<&Detection> = unmatched_detections.iter().map(|&i| high[i]).collect();

        // Step 4: Recover lost tracks with the leftover high score detections
        let AssignmentResult {
            matches,
            unmatched_tracks,
            unmatched_detections,
        } = self.associate(&lost, &high, self.config.lost_match_thresh, false);

        for (ilost, idet) in matches {
            debug!(track_id = self.arena[lost[ilost]].track_id, "re-acquired lost track");
            self.apply_match(lost[ilost], high[idet], &mut activated);
        }
        still_lost.extend(unmatched_tracks.iter().map(|&i| lost[i]));
        let high: Vec<&Detection> = unmatched_detections.iter().map(|&i| high[i]).collect();

        // Step 5: Second association, remaining tracked tracks with low score detections
        let low: Vec<&Detection> = detections_low.iter().collect();
        let AssignmentResult {
            matches,
            unmatched_tracks,
            ..
        } = self.associate(&r_tracked, &low, self.config.low_match_thresh, false);

        for (itracked, idet) in matches {
            self.apply_match(r_tracked[itracked], low[idet], &mut activated);
        }
        for idx in unmatched_tracks {
            let slot = r_tracked[idx];
            self.arena[slot].mark_lost();
            still_lost.push(slot);
        }

        // Deal with unconfirmed tracks, usually tracks with only one beginning frame
        let AssignmentResult {
            matches,
            unmatched_tracks,
            unmatched_detections,
        } = self.associate(
            &unconfirmed,
            &high,
            self.config.unconfirmed_match_thresh,
            self.config.fuse_score,
        );

        for (itracked, idet) in matches {
            self.apply_match(unconfirmed[itracked], high[idet], &mut activated);
        }
        for idx in unmatched_tracks {
            self.retire(unconfirmed[idx]);
        }

        // Step 6: Init new stracks
        let first_frame = self.frame_count == 1;
        for idx in unmatched_detections {
            let det = high[idx];
            self.next_id += 1;
            let track = STrack::new(det, &self.kalman_filter, self.next_id, frame_id, first_frame);
            activated.push(self.arena.insert(track));
        }

        // Step 7: Age out lost tracks
        let mut lost = Vec::with_capacity(still_lost.len());
        for slot in still_lost {
            if frame_id.saturating_sub(self.arena[slot].end_frame()) > self.max_time_lost {
                self.retire(slot);
            } else {
                lost.push(slot);
            }
        }

        // Step 8: Duplicate suppression between tracked and lost
        let (tracked, lost) = self.suppress_duplicates(activated, lost);
        self.tracked = tracked;
        self.lost = lost;

        debug!(
            frame_id,
            tracked = self.tracked.len(),
            lost = self.lost.len(),
            removed = self.removed.len(),
            "tracker updated"
        );

        self.tracked
            .iter()
            .map(|&slot| &self.arena[slot])
            .filter(|t| t.state.is_active())
            .map(STrack::to_result)
            .collect()
    }

    /// Predict each track `frames` frames ahead, dropping tracks whose filter
    /// state has diverged.
    fn predict(&mut self, slots: Vec<TrackSlot>, frames: u64) -> Vec<TrackSlot> {
        let mut alive = Vec::with_capacity(slots.len());
        for slot in slots {
            let track = &mut self.arena[slot];
            track.predict(&self.kalman_filter, frames);
            if track.is_finite() {
                alive.push(slot);
            } else {
                warn!(track_id = track.track_id, "dropping track with diverged motion state");
                self.retire(slot);
            }
        }
        alive
    }

    fn associate(
        &self,
        slots: &[TrackSlot],
        detections: &[&Detection],
        thresh: f32,
        fuse_score: bool,
    ) -> AssignmentResult {
        let geometry: Vec<TrackGeometry> = slots.iter().map(|&s| self.arena[s].geometry()).collect();
        let det_rects: Vec<Rect> = detections.iter().map(|d| d.bbox).collect();
        let mut dists = matching::association_distance(&geometry, &det_rects, &self.config.weights);
        if fuse_score {
            let scores: Vec<f32> = detections.iter().map(|d| d.score).collect();
            matching::fuse_score(&mut dists, &scores);
        }
        matching::linear_assignment(&dists, thresh)
    }

    fn apply_match(&mut self, slot: TrackSlot, det: &Detection, activated: &mut Vec<TrackSlot>) {
        let track = &mut self.arena[slot];
        match track.update(det, &self.kalman_filter, self.frame_id) {
            Ok(()) => activated.push(slot),
            Err(err) => {
                warn!(track_id = track.track_id, %err, "dropping track after filter failure");
                self.retire(slot);
            }
        }
    }

    /// Remove a track for good.
    fn retire(&mut self, slot: TrackSlot) {
        if let Some(mut track) = self.arena.remove(slot) {
            track.mark_removed();
            trace!(track_id = track.track_id, "track removed");
            self.removed.push(track.track_id);
        }
    }

    fn suppress_duplicates(
        &mut self,
        tracked: Vec<TrackSlot>,
        lost: Vec<TrackSlot>,
    ) -> (Vec<TrackSlot>, Vec<TrackSlot>) {
        let (keep_tracked, keep_lost) = {
            let a: Vec<&STrack> = tracked.iter().map(|&s| &self.arena[s]).collect();
            let b: Vec<&STrack> = lost.iter().map(|&s| &self.arena[s]).collect();
            remove_duplicate_stracks(&a, &b, self.config.duplicate_iou_thresh)
        };

        let (tracked, dup_tracked) = split_kept(tracked, &keep_tracked);
        let (lost, dup_lost) = split_kept(lost, &keep_lost);
        for slot in dup_tracked.into_iter().chain(dup_lost) {
            debug!(track_id = self.arena[slot].track_id, "suppressing duplicate track");
            self.retire(slot);
        }
        (tracked, lost)
    }
}

fn split_kept(slots: Vec<TrackSlot>, keep: &[usize]) -> (Vec<TrackSlot>, Vec<TrackSlot>) {
    let mut kept = Vec::with_capacity(keep.len());
    let mut dropped = Vec::new();
    let mut keep = keep.iter().peekable();
    for (i, slot) in slots.into_iter().enumerate() {
        if keep.next_if_eq(&&i).is_some() {
            kept.push(slot);
        } else {
            dropped.push(slot);
        }
    }
    (kept, dropped)
}

/// Resolve overlapping pairs between two track sets.
///
/// Any pair with IoU above `iou_thresh` keeps the track with the longer
/// tracklet; equal lengths keep the earlier start, and full ties keep the track
/// from `stracks_a`. Returns the ascending indices that survive in each set.
pub fn remove_duplicate_stracks(
    stracks_a: &[&STrack],
    stracks_b: &[&STrack],
    iou_thresh: f32,
) -> (Vec<usize>, Vec<usize>) {
    let mut dupa = vec![false; stracks_a.len()];
    let mut dupb = vec![false; stracks_b.len()];

    if !stracks_a.is_empty() && !stracks_b.is_empty() {
        let a_rects: Vec<Rect> = stracks_a.iter().map(|t| t.rect()).collect();
        let b_rects: Vec<Rect> = stracks_b.iter().map(|t| t.rect()).collect();
        let ious = iou_batch(&a_rects, &b_rects);

        for ((i, j), &iou) in ious.indexed_iter() {
            if iou > iou_thresh {
                if outlives(stracks_a[i], stracks_b[j]) {
                    dupb[j] = true;
                } else {
                    dupa[i] = true;
                }
            }
        }
    }

    let keep = |dups: Vec<bool>| -> Vec<usize> {
        dups.into_iter()
            .enumerate()
            .filter_map(|(i, dup)| (!dup).then_some(i))
            .collect()
    };
    (keep(dupa), keep(dupb))
}

fn outlives(a: &STrack, b: &STrack) -> bool {
    a.tracklet_len > b.tracklet_len
        || (a.tracklet_len == b.tracklet_len && a.start_frame <= b.start_frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::track_state::TrackState;

    fn det(x: f32, y: f32, score: f32) -> Detection {
        Detection::from_rect(Rect::new(x, y, 50.0, 100.0), score)
    }

    fn strack(x: f32, tracklet_len: u32, start_frame: u64) -> STrack {
        let mut t = STrack::new(&det(x, 0.0, 0.9), &KalmanFilter::default(), 1, start_frame, true);
        t.tracklet_len = tracklet_len;
        t
    }

    #[test]
    fn test_config_validation() {
        assert!(TrackerConfig::default().validate().is_ok());

        let bad = TrackerConfig {
            match_thresh: 1.5,
            ..Default::default()
        };
        assert_eq!(
            bad.validate(),
            Err(TrackerError::ThresholdOutOfRange {
                name: "match_thresh",
                value: 1.5
            })
        );

        let inverted = TrackerConfig {
            track_thresh: 0.7,
            high_thresh: 0.6,
            ..Default::default()
        };
        assert!(matches!(inverted.validate(), Err(TrackerError::ThresholdOrder { .. })));

        assert!(matches!(
            BYTETracker::with_frame_rate(0, 30),
            Err(TrackerError::InvalidFrameRate(_))
        ));

        let nan_noise = TrackerConfig {
            std_weight_velocity: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            nan_noise.validate(),
            Err(TrackerError::InvalidNoiseWeight {
                name: "std_weight_velocity",
                ..
            })
        ));

        let zero_noise = TrackerConfig {
            std_weight_position: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            BYTETracker::new(zero_noise),
            Err(TrackerError::InvalidNoiseWeight {
                name: "std_weight_position",
                ..
            })
        ));
    }

    #[test]
    fn test_max_time_lost() {
        assert_eq!(TrackerConfig::default().max_time_lost(), 30);
        let tracker = BYTETracker::with_frame_rate(15, 30).unwrap();
        assert_eq!(tracker.max_time_lost(), 15);
        let tracker = BYTETracker::with_frame_rate(60, 30).unwrap();
        assert_eq!(tracker.max_time_lost(), 60);
    }

    #[test]
    fn test_remove_duplicates_prefers_longer_tracklet() {
        let long = strack(0.0, 10, 1);
        let short = strack(1.0, 3, 5);
        let far = strack(500.0, 1, 1);

        let (a, b) = remove_duplicate_stracks(&[&short, &far], &[&long], 0.85);
        assert_eq!(a, vec![1]);
        assert_eq!(b, vec![0]);

        let (a, b) = remove_duplicate_stracks(&[&long], &[&short], 0.85);
        assert_eq!(a, vec![0]);
        assert!(b.is_empty());
    }

    #[test]
    fn test_remove_duplicates_tie_breaks_on_start_frame() {
        let early = strack(0.0, 4, 2);
        let late = strack(1.0, 4, 6);
        let (a, b) = remove_duplicate_stracks(&[&late], &[&early], 0.85);
        assert!(a.is_empty());
        assert_eq!(b, vec![0]);
    }

    #[test]
    fn test_remove_duplicates_ignores_low_overlap() {
        let x = strack(0.0, 4, 2);
        let y = strack(30.0, 1, 6);
        let (a, b) = remove_duplicate_stracks(&[&x], &[&y], 0.85);
        assert_eq!((a, b), (vec![0], vec![0]));

        let (a, b) = remove_duplicate_stracks(&[], &[&y], 0.85);
        assert!(a.is_empty());
        assert_eq!(b, vec![0]);
    }

    #[test]
    fn test_split_kept() {
        let mut arena = TrackArena::new();
        let slots: Vec<TrackSlot> = (0..4).map(|i| arena.insert(strack(i as f32, 0, 1))).collect();
        let (kept, dropped) = split_kept(slots.clone(), &[0, 2]);
        assert_eq!(kept, vec![slots[0], slots[2]]);
        assert_eq!(dropped, vec![slots[1], slots[3]]);
    }

    #[test]
    fn test_malformed_detections_are_dropped() {
        let mut tracker = BYTETracker::default();
        let tracks = tracker.update(vec![
            Detection::new(0.0, 0.0, 0.0, 10.0, 0.9),
            Detection::new(0.0, 0.0, 10.0, 10.0, f32::NAN),
            Detection::from_rect(Rect::new(f32::INFINITY, 0.0, 10.0, 10.0), 0.9),
        ]);
        assert!(tracks.is_empty());
        assert_eq!(tracker.tracked_tracks().count(), 0);
    }

    #[test]
    fn test_low_score_detections_never_spawn() {
        let mut tracker = BYTETracker::default();
        assert!(tracker.update(vec![det(0.0, 0.0, 0.3)]).is_empty());
        assert!(tracker.update(vec![det(0.0, 0.0, 0.05)]).is_empty());
        assert_eq!(tracker.tracked_tracks().count(), 0);
    }

    #[test]
    fn test_unconfirmed_track_lifecycle() {
        let mut tracker = BYTETracker::default();
        tracker.update(vec![det(0.0, 0.0, 0.9)]);

        // Born after the first frame: unconfirmed and not reported.
        let tracks = tracker.update(vec![det(0.0, 0.0, 0.9), det(300.0, 0.0, 0.9)]);
        assert_eq!(tracks.len(), 1);
        let newborn: Vec<_> = tracker
            .tracked_tracks()
            .filter(|t| t.state == TrackState::New)
            .map(|t| t.track_id)
            .collect();
        assert_eq!(newborn.len(), 1);

        // Confirmed by a second match.
        let tracks = tracker.update(vec![det(0.0, 0.0, 0.9), det(301.0, 0.0, 0.9)]);
        assert_eq!(tracks.len(), 2);
        assert!(tracks.iter().any(|t| t.track_id == newborn[0]));

        // An unconfirmed track that misses its second frame is removed.
        tracker.update(vec![det(0.0, 0.0, 0.9), det(301.0, 0.0, 0.9), det(600.0, 0.0, 0.9)]);
        let stray = tracker.next_id;
        tracker.update(vec![det(0.0, 0.0, 0.9), det(301.0, 0.0, 0.9)]);
        assert!(tracker.removed_track_ids().contains(&stray));
        assert!(tracker.lost_tracks().all(|t| t.track_id != stray));
    }

    #[test]
    fn test_lost_track_keeps_frame_id() {
        let mut tracker = BYTETracker::default();
        tracker.update(vec![det(0.0, 0.0, 0.9)]);
        tracker.update(vec![det(1.0, 0.0, 0.9)]);
        tracker.update(vec![]);
        tracker.update(vec![]);

        let lost: Vec<&STrack> = tracker.lost_tracks().collect();
        assert_eq!(lost.len(), 1);
        assert_eq!(lost[0].state, TrackState::Lost);
        assert_eq!(lost[0].frame_id, 2);
        assert_eq!(lost[0].score, 0.9);
    }

    #[test]
    fn test_stale_frame_index_is_advanced() {
        let mut tracker = BYTETracker::default();
        tracker.update_at(vec![det(0.0, 0.0, 0.9)], 10);
        assert_eq!(tracker.frame_id(), 10);
        let tracks = tracker.update_at(vec![det(0.0, 0.0, 0.9)], 4);
        assert_eq!(tracker.frame_id(), 11);
        assert_eq!(tracks[0].frame_id, 11);
    }

    #[test]
    fn test_filter_failure_removes_only_that_track() {
        let mut tracker = BYTETracker::default();
        let tracks = tracker.update(vec![det(0.0, 0.0, 0.9), det(300.0, 0.0, 0.9)]);
        assert_eq!(tracks.len(), 2);

        let broken = tracker.tracked[0];
        let broken_id = tracker.arena[broken].track_id;
        tracker.arena[broken].covariance_mut()[[0, 0]] = -1e9;

        let tracks = tracker.update(vec![det(0.0, 0.0, 0.9), det(300.0, 0.0, 0.9)]);
        assert_eq!(tracks.len(), 1);
        assert_ne!(tracks[0].track_id, broken_id);
        assert_eq!(tracker.removed_track_ids(), &[broken_id]);
        assert!(tracker.arena.get(broken).is_none());
    }

    #[test]
    fn test_frame_index_saturates() {
        let mut tracker = BYTETracker::default();
        tracker.update_at(vec![det(0.0, 0.0, 0.9)], u64::MAX);
        let tracks = tracker.update(vec![det(0.0, 0.0, 0.9)]);
        assert_eq!(tracker.frame_id(), u64::MAX);
        assert_eq!(tracks.len(), 1);
        tracker.update_at(vec![det(0.0, 0.0, 0.9)], 3);
        assert_eq!(tracker.frame_id(), u64::MAX);
    }

    #[test]
    fn test_motion_carries_across_frame_gap() {
        let mut tracker = BYTETracker::default();
        let mut id = None;
        for frame in 1..=10 {
            let tracks = tracker.update_at(vec![det(4.0 * frame as f32, 0.0, 0.9)], frame);
            assert_eq!(tracks.len(), 1);
            id = Some(tracks[0].track_id);
        }

        let tracks = tracker.update_at(vec![det(80.0, 0.0, 0.9)], 20);
        assert_eq!(tracks.len(), 1);
        assert_eq!(Some(tracks[0].track_id), id);
        assert!(tracks[0].rect.x > 60.0, "x = {}", tracks[0].rect.x);
        assert_eq!(tracker.lost_tracks().count(), 0);
    }

    #[test]
    fn test_skipped_frames_count_toward_aging() {
        let mut tracker = BYTETracker::with_frame_rate(30, 10).unwrap();
        tracker.update_at(vec![det(0.0, 0.0, 0.9)], 1);
        tracker.update_at(vec![], 2);
        assert_eq!(tracker.lost_tracks().count(), 1);
        tracker.update_at(vec![], 11);
        assert_eq!(tracker.lost_tracks().count(), 1);
        tracker.update_at(vec![], 12);
        assert_eq!(tracker.lost_tracks().count(), 0);
        assert_eq!(tracker.removed_track_ids(), &[1]);
    }
}
