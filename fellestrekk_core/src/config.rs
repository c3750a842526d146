// Copyright 2026 the Fellestrekk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Table layout and session tuning.
//!
//! All coordinates are in stage pixels with the origin at the top-left of an
//! 800×600 stage.

use kurbo::{Point, Size};

use crate::timing::FixedStepConfig;

/// Where cards sit on the table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TableLayout {
    /// Top-left corner of the first deck sprite.
    pub deck_origin: Point,
    /// Horizontal offset between stacked deck sprites.
    pub deck_spacing: f64,
    /// X of the first card in either hand.
    pub hand_x: f64,
    /// Horizontal offset between consecutive cards in a hand.
    pub slot_increment: f64,
    /// Y of the dealer's row.
    pub dealer_y: f64,
    /// Y of the player's row.
    pub player_y: f64,
    /// Where the dealer's hole card is lifted to while it flips.
    pub reveal_lift: Point,
    /// Natural size of a card sprite.
    pub card_size: Size,
}

impl TableLayout {
    /// The stock 800×600 table.
    pub const STANDARD: Self = Self {
        deck_origin: Point::new(20.0, 10.0),
        deck_spacing: 2.0,
        hand_x: 15.0,
        slot_increment: 12.0,
        dealer_y: 200.0,
        player_y: 400.0,
        reveal_lift: Point::new(15.0, 130.0),
        card_size: Size::new(72.0, 95.0),
    };

    /// Position of the deck sprite at `index` (0 is the bottom of the pile).
    #[must_use]
    pub fn deck_slot(&self, index: usize) -> Point {
        Point::new(
            self.deck_origin.x + index as f64 * self.deck_spacing,
            self.deck_origin.y,
        )
    }

    /// Where a card leaves the deck from when `deck_len` sprites remain.
    ///
    /// This is the top of the pile, or the deck origin when the pile is
    /// empty.
    #[must_use]
    pub fn draw_origin(&self, deck_len: usize) -> Point {
        Point::new(
            self.deck_origin.x + (deck_len as f64 - 1.0) * self.deck_spacing,
            self.deck_origin.y,
        )
    }

    /// Position of the `index`-th card in the dealer's row.
    #[must_use]
    pub fn dealer_slot(&self, index: usize) -> Point {
        Point::new(self.hand_slot_x(index), self.dealer_y)
    }

    /// Position of the `index`-th card in the player's row.
    #[must_use]
    pub fn player_slot(&self, index: usize) -> Point {
        Point::new(self.hand_slot_x(index), self.player_y)
    }

    fn hand_slot_x(&self, index: usize) -> f64 {
        self.hand_x + index as f64 * self.slot_increment
    }
}

impl Default for TableLayout {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Configuration for a [`Table`](crate::table::Table) session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TableConfig {
    /// Card placement.
    pub layout: TableLayout,
    /// Speed of a card travelling from the deck to a hand, in px/s.
    pub draw_speed: f64,
    /// Duration of the hole-card lift and flip, in seconds.
    pub reveal_secs: f64,
    /// Duration of the hole card settling back into the dealer row, in
    /// seconds.
    pub settle_secs: f64,
    /// Cards represented by one deck sprite.
    pub deck_divisor: u32,
    /// Balance shown before the server sends any money.
    pub starting_balance: i64,
    /// Amount bet by `HOST_OK` and the new-game key.
    pub auto_bet: u32,
    /// Frame clock tuning.
    pub fixed_step: FixedStepConfig,
}

impl TableConfig {
    /// Default configuration for the browser table.
    #[must_use]
    pub const fn web() -> Self {
        Self {
            layout: TableLayout::STANDARD,
            draw_speed: 800.0,
            reveal_secs: 0.4,
            settle_secs: 0.35,
            deck_divisor: 5,
            starting_balance: 1000,
            auto_bet: 100,
            fixed_step: FixedStepConfig::DEFAULT,
        }
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self::web()
    }
}
