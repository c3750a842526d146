// Copyright 2026 the Fellestrekk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sprite-sheet lookup.
//!
//! The card sheet is a grid with one row per suit and one column per rank.
//! Column 13 holds the extras: rows 0–1 are card backs, rows 2–3 jokers.
//!
//! ```text
//!          col 0 .. 12      col 13
//! row 0    ♣A .. ♣K         back 0
//! row 1    ♥A .. ♥K         back 1
//! row 2    ♠A .. ♠K         joker 0
//! row 3    ♦A .. ♦K         joker 1
//! ```

use kurbo::{Rect, Size};

use crate::card::{Card, Face};

/// A cell in the sprite-sheet grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Column (rank, or 13 for extras).
    pub column: u32,
    /// Row (suit, or variant row for extras).
    pub row: u32,
}

/// Immutable description of a loaded card sprite sheet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Atlas {
    /// Size of one card image.
    pub card_size: Size,
    /// Distance between the origins of horizontally adjacent cells.
    pub stride_x: f64,
    /// Distance between the origins of vertically adjacent cells.
    pub stride_y: f64,
}

impl Default for Atlas {
    fn default() -> Self {
        Self::CARDS
    }
}

impl Atlas {
    /// The stock `cards.png`: 72×95 cards on a 72×96 grid.
    pub const CARDS: Self = Self {
        card_size: Size::new(72.0, 95.0),
        stride_x: 72.0,
        stride_y: 96.0,
    };

    const EXTRAS_COLUMN: u32 = 13;

    /// Cell of a standard card.
    #[must_use]
    pub const fn card_cell(&self, card: Card) -> Cell {
        Cell {
            column: card.rank() as u32,
            row: card.suit() as u32,
        }
    }

    /// Cell of a joker.
    #[must_use]
    pub const fn joker_cell(&self, variant: u8) -> Cell {
        Cell {
            column: Self::EXTRAS_COLUMN,
            row: 2 + variant as u32,
        }
    }

    /// Cell of a card back.
    #[must_use]
    pub const fn back_cell(&self, variant: u8) -> Cell {
        Cell {
            column: Self::EXTRAS_COLUMN,
            row: variant as u32,
        }
    }

    /// Cell for any face.
    #[must_use]
    pub const fn cell(&self, face: Face) -> Cell {
        match face {
            Face::Card(card) => self.card_cell(card),
            Face::Joker(variant) => self.joker_cell(variant),
            Face::Back(variant) => self.back_cell(variant),
        }
    }

    /// Pixel rectangle of `face` within the sheet.
    #[must_use]
    pub fn source_rect(&self, face: Face) -> Rect {
        let cell = self.cell(face);
        let x = f64::from(cell.column) * self.stride_x;
        let y = f64::from(cell.row) * self.stride_y;
        Rect::new(
            x,
            y,
            x + self.card_size.width,
            y + self.card_size.height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Rank, Suit};

    #[test]
    fn card_cells_follow_suit_rows() {
        let atlas = Atlas::CARDS;
        let king_of_hearts = Card::new(Suit::Hearts, Rank::King);
        assert_eq!(atlas.cell(king_of_hearts.into()), Cell { column: 12, row: 1 });
        let ace_of_clubs = Card::new(Suit::Clubs, Rank::Ace);
        assert_eq!(atlas.cell(ace_of_clubs.into()), Cell { column: 0, row: 0 });
    }

    #[test]
    fn extras_live_in_column_thirteen() {
        let atlas = Atlas::CARDS;
        assert_eq!(atlas.cell(Face::Back(0)), Cell { column: 13, row: 0 });
        assert_eq!(atlas.cell(Face::Back(1)), Cell { column: 13, row: 1 });
        assert_eq!(atlas.cell(Face::Joker(0)), Cell { column: 13, row: 2 });
        assert_eq!(atlas.cell(Face::Joker(1)), Cell { column: 13, row: 3 });
    }

    #[test]
    fn source_rect_uses_grid_stride() {
        let atlas = Atlas::CARDS;
        let seven_of_spades = Card::new(Suit::Spades, Rank::Seven);
        let rect = atlas.source_rect(seven_of_spades.into());
        assert_eq!(rect, Rect::new(432.0, 192.0, 504.0, 287.0));
    }
}
