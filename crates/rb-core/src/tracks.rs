//! Bitmask of lockable robot subsystems ("tracks").
//!
//! An action declares the tracks it drives; while it runs those tracks are
//! locked so no other action (or animation) can move the same subsystem.
//! Behaviors may also lock tracks directly under a name of their choosing.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign, Not};

/// Set of robot subsystems, one bit per track.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnimTrackFlags(pub u8);

impl AnimTrackFlags {
    pub const NONE: AnimTrackFlags = AnimTrackFlags(0);
    pub const HEAD: AnimTrackFlags = AnimTrackFlags(1 << 0);
    pub const LIFT: AnimTrackFlags = AnimTrackFlags(1 << 1);
    pub const BODY: AnimTrackFlags = AnimTrackFlags(1 << 2);
    pub const FACE: AnimTrackFlags = AnimTrackFlags(1 << 3);
    pub const LIGHTS: AnimTrackFlags = AnimTrackFlags(1 << 4);
    pub const AUDIO: AnimTrackFlags = AnimTrackFlags(1 << 5);
    pub const EVENT: AnimTrackFlags = AnimTrackFlags(1 << 6);
    pub const ALL: AnimTrackFlags = AnimTrackFlags(0x7f);

    /// Number of distinct tracks.
    pub const NUM_TRACKS: usize = 7;

    const NAMES: [&'static str; Self::NUM_TRACKS] =
        ["head", "lift", "body", "face", "lights", "audio", "event"];

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// `true` if every bit of `other` is set in `self`.
    #[inline]
    pub fn contains(self, other: AnimTrackFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// `true` if at least one bit is shared.
    #[inline]
    pub fn intersects(self, other: AnimTrackFlags) -> bool {
        self.0 & other.0 != 0
    }

    /// Indices (0..NUM_TRACKS) of the set bits, lowest first.
    pub fn indices(self) -> impl Iterator<Item = usize> {
        (0..Self::NUM_TRACKS).filter(move |i| self.0 & (1 << i) != 0)
    }

    /// Single-track flag for a track index.
    #[inline]
    pub fn from_index(index: usize) -> AnimTrackFlags {
        debug_assert!(index < Self::NUM_TRACKS);
        AnimTrackFlags(1 << index)
    }
}

impl BitOr for AnimTrackFlags {
    type Output = AnimTrackFlags;
    #[inline]
    fn bitor(self, rhs: AnimTrackFlags) -> AnimTrackFlags {
        AnimTrackFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for AnimTrackFlags {
    #[inline]
    fn bitor_assign(&mut self, rhs: AnimTrackFlags) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for AnimTrackFlags {
    type Output = AnimTrackFlags;
    #[inline]
    fn bitand(self, rhs: AnimTrackFlags) -> AnimTrackFlags {
        AnimTrackFlags(self.0 & rhs.0)
    }
}

impl Not for AnimTrackFlags {
    type Output = AnimTrackFlags;
    #[inline]
    fn not(self) -> AnimTrackFlags {
        AnimTrackFlags(!self.0 & Self::ALL.0)
    }
}

impl fmt::Display for AnimTrackFlags {
    /// `head|body`, or `none` for the empty set.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let mut first = true;
        for i in self.indices() {
            if !first {
                f.write_str("|")?;
            }
            f.write_str(Self::NAMES[i])?;
            first = false;
        }
        Ok(())
    }
}
