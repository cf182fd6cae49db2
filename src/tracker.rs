mod arena;
mod byte_tracker;
mod detection;
mod kalman_filter;
mod lapjv;
mod matching;
mod palette;
mod rect;
mod strack;
mod track_state;

pub use arena::{TrackArena, TrackSlot};
pub use byte_tracker::{BYTETracker, TrackerConfig, remove_duplicate_stracks};
pub use detection::Detection;
pub use kalman_filter::KalmanFilter;
pub use lapjv::{assignment_cost, lapjv};
pub use matching::{
    AssignmentResult, AssociationWeights, TrackGeometry, association_distance, fuse_score,
    iou_distance, linear_assignment,
};
pub use palette::track_color;
pub use rect::{Rect, iou_batch};
pub use strack::{STrack, TrackResult};
pub use track_state::TrackState;
