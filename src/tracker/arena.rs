//! Slot storage for tracks.
//!
//! The tracker keeps every live track in one arena and partitions them with
//! lists of [`TrackSlot`]s. Moving a track between partitions moves a slot
//! index; the track itself never moves or gets copied. Removing a track frees
//! its slot for reuse by a later track.

use std::ops::{Index, IndexMut};

use crate::tracker::strack::STrack;

/// Stable handle to a live track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackSlot(usize);

#[derive(Debug, Clone, Default)]
pub struct TrackArena {
    slots: Vec<Option<STrack>>,
    free: Vec<usize>,
}

impl TrackArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, track: STrack) -> TrackSlot {
        match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(track);
                TrackSlot(index)
            }
            None => {
                self.slots.push(Some(track));
                TrackSlot(self.slots.len() - 1)
            }
        }
    }

    pub fn get(&self, slot: TrackSlot) -> Option<&STrack> {
        self.slots.get(slot.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, slot: TrackSlot) -> Option<&mut STrack> {
        self.slots.get_mut(slot.0).and_then(Option::as_mut)
    }

    /// Take the track out of the arena and free its slot.
    pub fn remove(&mut self, slot: TrackSlot) -> Option<STrack> {
        let track = self.slots.get_mut(slot.0)?.take()?;
        self.free.push(slot.0);
        Some(track)
    }

    /// Number of live tracks.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolve a list of slots, skipping any that are no longer live.
    pub fn resolve<'a>(&'a self, slots: &'a [TrackSlot]) -> impl Iterator<Item = &'a STrack> + 'a {
        slots.iter().filter_map(|&slot| self.get(slot))
    }
}

/// Panics on a freed slot. Partition lists only ever hold live slots.
impl Index<TrackSlot> for TrackArena {
    type Output = STrack;

    fn index(&self, slot: TrackSlot) -> &STrack {
        match self.get(slot) {
            Some(track) => track,
            None => panic!("track slot {} is not live", slot.0),
        }
    }
}

impl IndexMut<TrackSlot> for TrackArena {
    fn index_mut(&mut self, slot: TrackSlot) -> &mut STrack {
        match self.slots.get_mut(slot.0).and_then(Option::as_mut) {
            Some(track) => track,
            None => panic!("track slot {} is not live", slot.0),
        }
    }
}
