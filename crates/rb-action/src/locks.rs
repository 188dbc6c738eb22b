//! Name-keyed track locks.
//!
//! Each track keeps the set of names currently holding it.  A track is
//! locked while that set is non-empty, so independent holders (an action
//! identified by its tag, a behavior under a name of its choosing) can claim
//! the same track and each release only what it claimed.

use std::collections::BTreeSet;

use rb_core::{ActionTag, AnimTrackFlags};
use tracing::debug;

#[derive(Debug, Default)]
pub struct TrackLocks {
    holders: [BTreeSet<String>; AnimTrackFlags::NUM_TRACKS],
}

impl TrackLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock name used for the tracks an action holds while running.
    pub fn action_holder(tag: ActionTag) -> String {
        format!("action:{}", tag.0)
    }

    /// Add `who` to the holders of every track in `tracks`.
    pub fn lock(&mut self, tracks: AnimTrackFlags, who: &str) {
        for i in tracks.indices() {
            self.holders[i].insert(who.to_owned());
        }
        debug!(%tracks, who, "locked tracks");
    }

    /// Remove `who` from the holders of every track in `tracks`.
    ///
    /// Returns `true` if any of those tracks is still held by someone else.
    pub fn unlock(&mut self, tracks: AnimTrackFlags, who: &str) -> bool {
        let mut locks_left = false;
        for i in tracks.indices() {
            if !self.holders[i].remove(who) {
                debug!(%tracks, who, "track was not locked by this holder");
            }
            locks_left |= !self.holders[i].is_empty();
        }
        locks_left
    }

    pub fn are_any_locked(&self, tracks: AnimTrackFlags) -> bool {
        tracks.indices().any(|i| !self.holders[i].is_empty())
    }

    /// `false` for the empty set.
    pub fn are_all_locked(&self, tracks: AnimTrackFlags) -> bool {
        !tracks.is_empty() && tracks.indices().all(|i| !self.holders[i].is_empty())
    }

    /// `false` for the empty set.
    pub fn are_all_locked_by(&self, tracks: AnimTrackFlags, who: &str) -> bool {
        !tracks.is_empty() && tracks.indices().all(|i| self.holders[i].contains(who))
    }

    /// Union of all currently locked tracks.
    pub fn locked(&self) -> AnimTrackFlags {
        (0..AnimTrackFlags::NUM_TRACKS)
            .filter(|&i| !self.holders[i].is_empty())
            .fold(AnimTrackFlags::NONE, |acc, i| acc | AnimTrackFlags::from_index(i))
    }

    /// Drop every lock from every holder.
    pub fn unlock_all(&mut self) {
        for set in &mut self.holders {
            set.clear();
        }
    }
}
