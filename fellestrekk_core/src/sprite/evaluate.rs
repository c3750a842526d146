// Copyright 2026 the Fellestrekk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame evaluation and change tracking.
//!
//! Evaluation drains the per-slot change records accumulated since the
//! previous call and sorts them by channel. Sprites created since the last
//! evaluate are reported only in [`FrameChanges::added`]; the presenter
//! builds them from the current state, so their property changes are not
//! repeated in the other lists.
//!
//! [`FrameChanges`] uses raw slot indices (`u32`) rather than [`SpriteId`]
//! handles so that presenters can index directly into the store's SoA arrays
//! via the `*_at()` accessors (e.g.
//! [`position_at`](super::SpriteStore::position_at)).
//!
//! `added` is in creation order; presenters that stack equal z-indices by
//! insertion order rely on it.
//!
//! A slot can appear in both `removed` and `added` when a sprite was
//! destroyed and its slot reused within one frame. Presenters must apply
//! removals first.
//!
//! [`SpriteId`]: super::SpriteId

use alloc::vec::Vec;

use super::store::{SpriteStore, channel};

/// The set of changes produced by a single [`SpriteStore::evaluate`] call.
#[derive(Clone, Debug, Default)]
pub struct FrameChanges {
    /// Sprites added since the last evaluate.
    pub added: Vec<u32>,
    /// Sprites removed since the last evaluate.
    pub removed: Vec<u32>,
    /// Sprites whose position or width changed.
    pub moved: Vec<u32>,
    /// Sprites whose face changed.
    pub faces: Vec<u32>,
    /// Sprites whose z-index changed.
    pub restacked: Vec<u32>,
}

impl FrameChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.added.clear();
        self.removed.clear();
        self.moved.clear();
        self.faces.clear();
        self.restacked.clear();
    }

    /// Returns whether nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
            && self.removed.is_empty()
            && self.moved.is_empty()
            && self.faces.is_empty()
            && self.restacked.is_empty()
    }
}

impl SpriteStore {
    /// Drains the recorded changes into a fresh [`FrameChanges`].
    pub fn evaluate(&mut self) -> FrameChanges {
        let mut changes = FrameChanges::default();
        self.evaluate_into(&mut changes);
        changes
    }

    /// Like [`evaluate`](Self::evaluate), but reuses a caller-provided buffer
    /// to avoid allocation.
    pub fn evaluate_into(&mut self, changes: &mut FrameChanges) {
        changes.clear();

        // Move lifecycle lists.
        core::mem::swap(&mut self.pending_added, &mut changes.added);
        core::mem::swap(&mut self.pending_removed, &mut changes.removed);

        let mut slots = core::mem::take(&mut self.dirty_slots);
        slots.sort_unstable();
        for &idx in &slots {
            let bits = core::mem::take(&mut self.dirty[idx as usize]);
            if bits == 0 || !self.alive[idx as usize] || changes.added.contains(&idx) {
                continue;
            }
            if bits & channel::GEOMETRY != 0 {
                changes.moved.push(idx);
            }
            if bits & channel::FACE != 0 {
                changes.faces.push(idx);
            }
            if bits & channel::STACKING != 0 {
                changes.restacked.push(idx);
            }
        }
        slots.clear();
        self.dirty_slots = slots;
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Size};

    use super::*;
    use crate::card::Face;

    const CARD: Size = Size::new(72.0, 95.0);

    #[test]
    fn new_sprites_are_reported_once_as_added() {
        let mut store = SpriteStore::new();
        let id = store.create_sprite(Point::ORIGIN, CARD, Face::BACK);
        store.set_position(id, Point::new(3.0, 4.0));

        let changes = store.evaluate();
        assert_eq!(changes.added, [id.index()]);
        assert!(changes.moved.is_empty(), "added sprites are built whole");

        let changes = store.evaluate();
        assert!(changes.is_empty(), "second evaluate has nothing to report");
    }

    #[test]
    fn property_changes_land_in_their_channel() {
        let mut store = SpriteStore::new();
        let a = store.create_sprite(Point::ORIGIN, CARD, Face::BACK);
        let b = store.create_sprite(Point::ORIGIN, CARD, Face::BACK);
        let _ = store.evaluate();

        store.set_face(b, Face::Joker(1));
        store.set_width(a, 36.0);
        store.shift_z_index(b, 1);
        store.set_position(a, Point::new(1.0, 1.0));

        let changes = store.evaluate();
        assert_eq!(changes.moved, [a.index()], "two geometry edits, one entry");
        assert_eq!(changes.faces, [b.index()]);
        assert_eq!(changes.restacked, [b.index()]);
    }

    #[test]
    fn removed_sprites_drop_pending_changes() {
        let mut store = SpriteStore::new();
        let id = store.create_sprite(Point::ORIGIN, CARD, Face::BACK);
        let _ = store.evaluate();

        store.set_position(id, Point::new(9.0, 9.0));
        store.destroy(id);

        let changes = store.evaluate();
        assert_eq!(changes.removed, [id.index()]);
        assert!(changes.moved.is_empty());
    }

    #[test]
    fn created_and_destroyed_in_one_frame_is_invisible() {
        let mut store = SpriteStore::new();
        let id = store.create_sprite(Point::ORIGIN, CARD, Face::BACK);
        store.destroy(id);
        let changes = store.evaluate();
        assert!(changes.is_empty(), "got {changes:?}");
    }

    #[test]
    fn slot_churn_within_one_frame_reports_a_single_removal() {
        let mut store = SpriteStore::new();
        let first = store.create_sprite(Point::ORIGIN, CARD, Face::BACK);
        let _ = store.evaluate();

        store.destroy(first);
        let second = store.create_sprite(Point::ORIGIN, CARD, Face::BACK);
        store.destroy(second);

        let changes = store.evaluate();
        assert_eq!(changes.removed, [first.index()]);
        assert!(changes.added.is_empty());
    }

    #[test]
    fn slot_reuse_reports_remove_then_add() {
        let mut store = SpriteStore::new();
        let old = store.create_sprite(Point::ORIGIN, CARD, Face::BACK);
        let _ = store.evaluate();

        store.destroy(old);
        let new = store.create_sprite(Point::ORIGIN, CARD, Face::BACK);
        assert_eq!(old.index(), new.index());

        let changes = store.evaluate();
        assert_eq!(changes.removed, [old.index()]);
        assert_eq!(changes.added, [new.index()]);
    }
}
