// Copyright 2026 the Fellestrekk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The card collections on the table.

use alloc::vec::Vec;

use kurbo::Point;

use crate::animation::{CardMotion, Timing};
use crate::card::Face;
use crate::config::TableLayout;
use crate::sprite::{SpriteId, SpriteStore};

/// Sprites on the table, grouped into the deck pile and the two hands.
///
/// Each collection is ordered: `deck` bottom to top, hands left to right.
#[derive(Debug)]
pub struct Scene {
    /// All sprites.
    pub sprites: SpriteStore,
    /// Face-down pile standing in for the undealt shoe.
    pub deck: Vec<SpriteId>,
    /// The dealer's cards.
    pub dealer: Vec<SpriteId>,
    /// The local player's cards.
    pub player: Vec<SpriteId>,
    /// Card placement.
    pub layout: TableLayout,
    draw_timing: Timing,
}

impl Scene {
    /// Creates an empty table. Drawn cards travel with `draw_timing`.
    #[must_use]
    pub fn new(layout: TableLayout, draw_timing: Timing) -> Self {
        Self {
            sprites: SpriteStore::new(),
            deck: Vec::new(),
            dealer: Vec::new(),
            player: Vec::new(),
            layout,
            draw_timing,
        }
    }

    /// Creates a face-down card on top of the deck and plans its trip to
    /// `target`, revealing `face` halfway if given.
    ///
    /// The caller queues the motion and files the handle into a hand.
    pub fn draw_card(&mut self, target: Point, face: Option<Face>) -> (SpriteId, CardMotion) {
        let origin = self.layout.draw_origin(self.deck.len());
        let sprite = self
            .sprites
            .create_sprite(origin, self.layout.card_size, Face::BACK);
        let motion = CardMotion::new(&self.sprites, sprite, target, self.draw_timing, face);
        (sprite, motion)
    }

    /// Grows or shrinks the deck pile to `target` sprites.
    ///
    /// New sprites are placed at once; surplus sprites are removed from the
    /// top of the pile.
    pub fn set_deck_size(&mut self, target: usize) {
        while self.deck.len() < target {
            let at = self.layout.deck_slot(self.deck.len());
            let sprite = self
                .sprites
                .create_sprite(at, self.layout.card_size, Face::BACK);
            self.deck.push(sprite);
        }
        while self.deck.len() > target {
            if let Some(sprite) = self.deck.pop() {
                self.sprites.destroy(sprite);
            }
        }
    }

    /// Removes both hands from the table.
    pub fn clear_hands(&mut self) {
        for sprite in self.dealer.drain(..).chain(self.player.drain(..)) {
            self.sprites.destroy(sprite);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene() -> Scene {
        Scene::new(TableLayout::STANDARD, Timing::BySpeed(800.0))
    }

    #[test]
    fn deck_grows_and_shrinks_from_the_top() {
        let mut scene = scene();
        scene.set_deck_size(3);
        let pile = scene.deck.clone();
        assert_eq!(scene.sprites.position(pile[2]), Point::new(24.0, 10.0));

        scene.set_deck_size(1);
        assert_eq!(scene.deck, [pile[0]]);
        assert!(!scene.sprites.is_alive(pile[1]));
        assert!(!scene.sprites.is_alive(pile[2]));
    }

    #[test]
    fn drawn_card_starts_face_down_on_the_pile() {
        let mut scene = scene();
        scene.set_deck_size(4);
        let (sprite, motion) = scene.draw_card(Point::new(15.0, 400.0), Some(Face::Joker(1)));
        assert_eq!(scene.sprites.position(sprite), Point::new(26.0, 10.0));
        assert_eq!(scene.sprites.face(sprite), Face::BACK);
        assert_eq!(motion.pending_flip(), Some(Face::Joker(1)));
        assert_eq!(scene.deck.len(), 4, "drawing does not shrink the pile");
    }

    #[test]
    fn clear_hands_destroys_both_hands() {
        let mut scene = scene();
        let (a, _) = scene.draw_card(Point::ORIGIN, None);
        let (b, _) = scene.draw_card(Point::ORIGIN, None);
        scene.dealer.push(a);
        scene.player.push(b);
        scene.clear_hands();
        assert!(scene.dealer.is_empty() && scene.player.is_empty());
        assert!(!scene.sprites.is_alive(a));
        assert!(!scene.sprites.is_alive(b));
    }
}
