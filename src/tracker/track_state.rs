use serde::{Deserialize, Serialize};

/// Lifecycle of a track.
///
/// `New -> Tracked` on the first match after birth, `Tracked <-> Lost` on
/// misses and re-acquisition, and `Removed` once the lost buffer runs out or a
/// duplicate is suppressed. `Removed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub enum TrackState {
    /// Born from a detection but not yet confirmed by a second match
    #[default]
    New,
    Tracked,
    /// Unmatched, kept for re-acquisition until `max_time_lost` expires
    Lost,
    Removed,
}

impl TrackState {
    /// Tracks in this state are reported to the caller.
    #[inline]
    pub fn is_active(self) -> bool {
        self == TrackState::Tracked
    }
}
