// Copyright 2026 the Fellestrekk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sprite identity.

use core::fmt;

/// A handle to a sprite in a [`SpriteStore`](super::SpriteStore).
///
/// Contains both a slot index and a generation counter so that stale handles
/// can be detected after a sprite is destroyed and the slot is reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpriteId {
    pub(crate) idx: u32,
    pub(crate) generation: u32,
}

impl SpriteId {
    /// Returns the raw slot index (for diagnostics and `*_at` accessors).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for SpriteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SpriteId({}@gen{})", self.idx, self.generation)
    }
}
