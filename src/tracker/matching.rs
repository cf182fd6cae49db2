//! Association costs and thresholded assignment.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::tracker::lapjv::lapjv;
use crate::tracker::rect::Rect;

/// What the association step needs to know about a track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackGeometry {
    /// Predicted box for the current frame
    pub rect: Rect,
    /// Center velocity in pixels per frame
    pub velocity: (f32, f32),
}

/// Optional penalties added to the IoU distance.
///
/// All weights default to zero, which leaves the plain `1 - IoU` cost. Each
/// penalty is bounded to [0, 1] before weighting and the final distance is
/// clamped to [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssociationWeights {
    /// Relative aspect-ratio change between track and detection
    pub posture: f32,
    /// Center displacement normalised by the track's diagonal
    pub speed: f32,
    /// Disagreement between the displacement direction and the track velocity
    pub lineness: f32,
}

impl AssociationWeights {
    /// Posture 0.4, speed 0.6, lineness 0.8.
    pub fn proportional() -> Self {
        Self {
            posture: 0.4,
            speed: 0.6,
            lineness: 0.8,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.posture == 0.0 && self.speed == 0.0 && self.lineness == 0.0
    }
}

/// IoU distance matrix: entry (i, j) is `1 - IoU(track_i, det_j)`.
pub fn iou_distance(track_boxes: &[Rect], det_boxes: &[Rect]) -> Array2<f32> {
    let mut dists = Array2::zeros((track_boxes.len(), det_boxes.len()));
    for (i, t) in track_boxes.iter().enumerate() {
        for (j, d) in det_boxes.iter().enumerate() {
            dists[[i, j]] = 1.0 - t.iou(d);
        }
    }
    dists
}

/// IoU distance plus the weighted penalties of `weights`.
pub fn association_distance(
    tracks: &[TrackGeometry],
    det_boxes: &[Rect],
    weights: &AssociationWeights,
) -> Array2<f32> {
    let track_boxes: Vec<Rect> = tracks.iter().map(|t| t.rect).collect();
    let mut dists = iou_distance(&track_boxes, det_boxes);
    if weights.is_zero() {
        return dists;
    }

    for (i, track) in tracks.iter().enumerate() {
        for (j, det) in det_boxes.iter().enumerate() {
            let penalty = weights.posture * posture_penalty(&track.rect, det)
                + weights.speed * speed_penalty(&track.rect, det)
                + weights.lineness * lineness_penalty(track, det);
            dists[[i, j]] = (dists[[i, j]] + penalty).clamp(0.0, 1.0);
        }
    }
    dists
}

fn posture_penalty(track: &Rect, det: &Rect) -> f32 {
    let a_t = track.to_xyah()[2];
    let a_d = det.to_xyah()[2];
    let larger = a_t.max(a_d);
    if larger > 0.0 {
        (a_t - a_d).abs() / larger
    } else {
        0.0
    }
}

fn speed_penalty(track: &Rect, det: &Rect) -> f32 {
    let (tx, ty) = track.center();
    let (dx, dy) = det.center();
    let diagonal = track.width.hypot(track.height);
    if diagonal > 0.0 {
        ((dx - tx).hypot(dy - ty) / diagonal).min(1.0)
    } else {
        0.0
    }
}

fn lineness_penalty(track: &TrackGeometry, det: &Rect) -> f32 {
    const EPS: f32 = 1e-3;
    let (vx, vy) = track.velocity;
    let speed = vx.hypot(vy);
    if speed < EPS {
        return 0.0;
    }

    // Displacement from where the track was before this frame's prediction.
    let (px, py) = track.rect.center();
    let (dx, dy) = det.center();
    let (mx, my) = (dx - (px - vx), dy - (py - vy));
    let moved = mx.hypot(my);
    if moved < EPS {
        return 0.0;
    }

    let cos = ((mx * vx + my * vy) / (moved * speed)).clamp(-1.0, 1.0);
    (1.0 - cos) / 2.0
}

/// Blend detection confidence into an IoU distance matrix: `1 - IoU * score`.
pub fn fuse_score(cost_matrix: &mut Array2<f32>, scores: &[f32]) {
    for ((_, j), cost) in cost_matrix.indexed_iter_mut() {
        let iou_sim = 1.0 - *cost;
        *cost = 1.0 - iou_sim * scores[j];
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentResult {
    pub matches: Vec<(usize, usize)>,
    pub unmatched_tracks: Vec<usize>,
    pub unmatched_detections: Vec<usize>,
}

/// Minimum-cost assignment with rejection of pairs costing more than `thresh`.
///
/// Rejected pairs leave both the track and the detection unmatched. Unmatched
/// indices are returned in ascending order.
pub fn linear_assignment(cost_matrix: &Array2<f32>, thresh: f32) -> AssignmentResult {
    let (num_rows, num_cols) = cost_matrix.dim();

    let mut matches = Vec::new();
    let mut unmatched_tracks = Vec::new();
    let mut detection_matched = vec![false; num_cols];

    for (row, col) in lapjv(cost_matrix.view()).into_iter().enumerate() {
        match col {
            Some(col) if cost_matrix[[row, col]] <= thresh => {
                matches.push((row, col));
                detection_matched[col] = true;
            }
            _ => unmatched_tracks.push(row),
        }
    }
    debug_assert_eq!(matches.len() + unmatched_tracks.len(), num_rows);

    let unmatched_detections = detection_matched
        .iter()
        .enumerate()
        .filter_map(|(j, &matched)| (!matched).then_some(j))
        .collect();

    AssignmentResult {
        matches,
        unmatched_tracks,
        unmatched_detections,
    }
}
