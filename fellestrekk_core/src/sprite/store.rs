// Copyright 2026 the Fellestrekk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays sprite storage with allocation and property management.

use alloc::vec::Vec;

use kurbo::{Point, Size};

use crate::card::Face;

use super::id::SpriteId;

pub(crate) mod channel {
    pub(crate) const GEOMETRY: u8 = 1 << 0;
    pub(crate) const FACE: u8 = 1 << 1;
    pub(crate) const STACKING: u8 = 1 << 2;
}

/// Struct-of-arrays storage for all sprites.
///
/// Sprites are addressed by [`SpriteId`] handles. Internally, each sprite
/// occupies a slot in parallel arrays. Destroyed sprites are recycled via a
/// free list, and generation counters prevent stale handle access.
#[derive(Debug, Default)]
pub struct SpriteStore {
    // -- Properties --
    pub(crate) position: Vec<Point>,
    pub(crate) width: Vec<f64>,
    pub(crate) natural_width: Vec<f64>,
    pub(crate) height: Vec<f64>,
    pub(crate) face: Vec<Face>,
    pub(crate) z_index: Vec<i32>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) alive: Vec<bool>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Change tracking --
    pub(crate) dirty: Vec<u8>,
    pub(crate) dirty_slots: Vec<u32>,

    // -- Lifecycle tracking --
    pub(crate) pending_added: Vec<u32>,
    pub(crate) pending_removed: Vec<u32>,
}

impl SpriteStore {
    /// Creates an empty sprite store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -- Allocation API --

    /// Creates a sprite of natural `size` at `position` showing `face`.
    ///
    /// The sprite starts at its natural width with z-index 0.
    pub fn create_sprite(&mut self, position: Point, size: Size, face: Face) -> SpriteId {
        let idx = if let Some(idx) = self.free_list.pop() {
            let i = idx as usize;
            self.generation[i] += 1;
            self.alive[i] = true;
            self.position[i] = position;
            self.width[i] = size.width;
            self.natural_width[i] = size.width;
            self.height[i] = size.height;
            self.face[i] = face;
            self.z_index[i] = 0;
            self.dirty[i] = 0;
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.position.push(position);
            self.width.push(size.width);
            self.natural_width.push(size.width);
            self.height.push(size.height);
            self.face.push(face);
            self.z_index.push(0);
            self.generation.push(0);
            self.alive.push(true);
            self.dirty.push(0);
            idx
        };

        self.pending_added.push(idx);

        SpriteId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Destroys a sprite, freeing its slot for reuse.
    ///
    /// Destroying an already-stale handle is a no-op and returns `false`.
    pub fn destroy(&mut self, id: SpriteId) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        let i = id.idx as usize;
        // Bump generation so old handles immediately fail validation.
        self.generation[i] += 1;
        self.alive[i] = false;
        self.dirty[i] = 0;
        self.free_list.push(id.idx);
        // A sprite created since the last evaluate was never presented.
        if let Some(pos) = self.pending_added.iter().position(|&a| a == id.idx) {
            self.pending_added.remove(pos);
        } else {
            self.pending_removed.push(id.idx);
        }
        true
    }

    /// Returns whether the given handle refers to a live sprite.
    #[must_use]
    pub fn is_alive(&self, id: SpriteId) -> bool {
        id.idx < self.len
            && self.alive[id.idx as usize]
            && self.generation[id.idx as usize] == id.generation
    }

    /// Returns the number of live sprites.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.alive.iter().filter(|&&a| a).count()
    }

    /// Returns an iterator over the handles of all live sprites, in slot
    /// order.
    pub fn iter(&self) -> impl Iterator<Item = SpriteId> + '_ {
        (0..self.len)
            .filter(|&idx| self.alive[idx as usize])
            .map(|idx| SpriteId {
                idx,
                generation: self.generation[idx as usize],
            })
    }

    // -- Property getters --

    /// Returns the top-left position of a sprite.
    #[must_use]
    pub fn position(&self, id: SpriteId) -> Point {
        self.validate(id);
        self.position[id.idx as usize]
    }

    /// Returns the current (possibly mid-flip) width of a sprite.
    #[must_use]
    pub fn width(&self, id: SpriteId) -> f64 {
        self.validate(id);
        self.width[id.idx as usize]
    }

    /// Returns the width the sprite has when not flipping.
    #[must_use]
    pub fn natural_width(&self, id: SpriteId) -> f64 {
        self.validate(id);
        self.natural_width[id.idx as usize]
    }

    /// Returns the face a sprite shows.
    #[must_use]
    pub fn face(&self, id: SpriteId) -> Face {
        self.validate(id);
        self.face[id.idx as usize]
    }

    /// Returns the z-index of a sprite.
    #[must_use]
    pub fn z_index(&self, id: SpriteId) -> i32 {
        self.validate(id);
        self.z_index[id.idx as usize]
    }

    // -- Mutation API (auto-marks dirty) --

    /// Moves a sprite's top-left corner to `position`.
    pub fn set_position(&mut self, id: SpriteId, position: Point) {
        self.validate(id);
        self.position[id.idx as usize] = position;
        self.mark(id.idx, channel::GEOMETRY);
    }

    /// Sets a sprite's horizontal extent.
    pub fn set_width(&mut self, id: SpriteId, width: f64) {
        self.validate(id);
        self.width[id.idx as usize] = width;
        self.mark(id.idx, channel::GEOMETRY);
    }

    /// Swaps the texture a sprite shows.
    pub fn set_face(&mut self, id: SpriteId, face: Face) {
        self.validate(id);
        self.face[id.idx as usize] = face;
        self.mark(id.idx, channel::FACE);
    }

    /// Raises (positive `delta`) or lowers a sprite in the stacking order.
    pub fn shift_z_index(&mut self, id: SpriteId, delta: i32) {
        self.validate(id);
        let z = &mut self.z_index[id.idx as usize];
        *z = z.saturating_add(delta);
        self.mark(id.idx, channel::STACKING);
    }

    // -- Raw-index accessors for backends --
    //
    // These accept raw slot indices (as found in `FrameChanges`) rather than
    // `SpriteId` handles, skipping generation validation.

    /// Returns the position at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn position_at(&self, idx: u32) -> Point {
        self.check_slot(idx);
        self.position[idx as usize]
    }

    /// Returns the width at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn width_at(&self, idx: u32) -> f64 {
        self.check_slot(idx);
        self.width[idx as usize]
    }

    /// Returns the natural width at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn natural_width_at(&self, idx: u32) -> f64 {
        self.check_slot(idx);
        self.natural_width[idx as usize]
    }

    /// Returns the height at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn height_at(&self, idx: u32) -> f64 {
        self.check_slot(idx);
        self.height[idx as usize]
    }

    /// Returns the face at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn face_at(&self, idx: u32) -> Face {
        self.check_slot(idx);
        self.face[idx as usize]
    }

    /// Returns the z-index at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn z_index_at(&self, idx: u32) -> i32 {
        self.check_slot(idx);
        self.z_index[idx as usize]
    }

    // -- Internal helpers --

    /// Panics if the handle is stale.
    fn validate(&self, id: SpriteId) {
        assert!(
            self.is_alive(id),
            "stale SpriteId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    fn check_slot(&self, idx: u32) {
        assert!(
            idx < self.len,
            "slot index {idx} out of range (len {})",
            self.len
        );
    }

    fn mark(&mut self, idx: u32, bits: u8) {
        let slot = &mut self.dirty[idx as usize];
        if *slot == 0 {
            self.dirty_slots.push(idx);
        }
        *slot |= bits;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    const CARD: Size = Size::new(72.0, 95.0);

    #[test]
    fn create_and_destroy() {
        let mut store = SpriteStore::new();
        let id = store.create_sprite(Point::ORIGIN, CARD, Face::BACK);
        assert!(store.is_alive(id));
        assert!(store.destroy(id), "first destroy succeeds");
        assert!(!store.is_alive(id));
        assert!(!store.destroy(id), "second destroy is a no-op");
    }

    #[test]
    fn generation_prevents_stale_access() {
        let mut store = SpriteStore::new();
        let id1 = store.create_sprite(Point::ORIGIN, CARD, Face::BACK);
        store.destroy(id1);
        let id2 = store.create_sprite(Point::ORIGIN, CARD, Face::BACK);
        // id2 reuses the same slot but has a different generation.
        assert!(!store.is_alive(id1));
        assert!(store.is_alive(id2));
        assert_eq!(id1.idx, id2.idx);
        assert_ne!(id1.generation, id2.generation);
    }

    #[test]
    fn reused_slot_is_reset() {
        let mut store = SpriteStore::new();
        let old = store.create_sprite(Point::new(5.0, 5.0), CARD, Face::BACK);
        store.set_width(old, 10.0);
        store.shift_z_index(old, 3);
        store.destroy(old);
        let new = store.create_sprite(Point::new(1.0, 2.0), CARD, Face::Joker(0));
        assert_eq!(store.position(new), Point::new(1.0, 2.0));
        assert_eq!(store.width(new), 72.0);
        assert_eq!(store.z_index(new), 0);
        assert_eq!(store.face(new), Face::Joker(0));
    }

    #[test]
    fn iter_skips_dead_slots() {
        let mut store = SpriteStore::new();
        let a = store.create_sprite(Point::ORIGIN, CARD, Face::BACK);
        let b = store.create_sprite(Point::ORIGIN, CARD, Face::BACK);
        let c = store.create_sprite(Point::ORIGIN, CARD, Face::BACK);
        store.destroy(b);
        let live: Vec<_> = store.iter().collect();
        assert_eq!(live, vec![a, c]);
        assert_eq!(store.live_count(), 2);
    }

    #[test]
    fn z_index_shifts_accumulate() {
        let mut store = SpriteStore::new();
        let id = store.create_sprite(Point::ORIGIN, CARD, Face::BACK);
        store.shift_z_index(id, 1);
        store.shift_z_index(id, -2);
        assert_eq!(store.z_index(id), -1);
    }

    #[test]
    #[should_panic(expected = "stale SpriteId")]
    fn stale_handle_panics_on_access() {
        let mut store = SpriteStore::new();
        let id = store.create_sprite(Point::ORIGIN, CARD, Face::BACK);
        store.destroy(id);
        let _ = store.position(id);
    }
}
