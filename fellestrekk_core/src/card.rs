// Copyright 2026 the Fellestrekk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Card tokens and sprite faces.
//!
//! The server names cards with a suit glyph followed by a rank: `♣A`, `♥10`,
//! `♠Q`. Each token maps to an index in `0..52`:
//!
//! ```text
//! index = suit_base + rank_offset
//! suit_base:   ♣ 0   ♥ 13   ♠ 26   ♦ 39
//! rank_offset: A 0   2..=10 → n − 1   J 10   Q 11   K 12
//! ```
//!
//! A [`Face`] is what a sprite shows: a card, a joker, or a card back.

use core::fmt;
use core::str::FromStr;

/// Errors from parsing a card token.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseCardError {
    /// The token was empty.
    #[error("empty card token")]
    Empty,
    /// The first character is not one of `♣ ♥ ♠ ♦`.
    #[error("unknown suit glyph {0:?}")]
    Suit(char),
    /// The rank part is not `A`, `J`, `Q`, `K` or a number in `2..=10`.
    #[error("unknown rank")]
    Rank,
}

/// Card suit, in sprite-sheet row order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Suit {
    /// ♣
    Clubs = 0,
    /// ♥
    Hearts = 1,
    /// ♠
    Spades = 2,
    /// ♦
    Diamonds = 3,
}

impl Suit {
    /// All suits in index order.
    pub const ALL: [Self; 4] = [Self::Clubs, Self::Hearts, Self::Spades, Self::Diamonds];

    /// Returns the suit glyph used on the wire.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Clubs => '♣',
            Self::Hearts => '♥',
            Self::Spades => '♠',
            Self::Diamonds => '♦',
        }
    }

    fn from_glyph(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.glyph() == c)
    }
}

/// Card rank, in sprite-sheet column order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Rank {
    /// A
    Ace = 0,
    /// 2
    Two = 1,
    /// 3
    Three = 2,
    /// 4
    Four = 3,
    /// 5
    Five = 4,
    /// 6
    Six = 5,
    /// 7
    Seven = 6,
    /// 8
    Eight = 7,
    /// 9
    Nine = 8,
    /// 10
    Ten = 9,
    /// J
    Jack = 10,
    /// Q
    Queen = 11,
    /// K
    King = 12,
}

impl Rank {
    /// All ranks in index order.
    pub const ALL: [Self; 13] = [
        Self::Ace,
        Self::Two,
        Self::Three,
        Self::Four,
        Self::Five,
        Self::Six,
        Self::Seven,
        Self::Eight,
        Self::Nine,
        Self::Ten,
        Self::Jack,
        Self::Queen,
        Self::King,
    ];

    fn from_token(s: &str) -> Option<Self> {
        match s {
            "A" => Some(Self::Ace),
            "J" => Some(Self::Jack),
            "Q" => Some(Self::Queen),
            "K" => Some(Self::King),
            _ => match s.parse::<u8>() {
                Ok(n @ 2..=10) => Some(Self::ALL[usize::from(n - 1)]),
                _ => None,
            },
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ace => f.write_str("A"),
            Self::Jack => f.write_str("J"),
            Self::Queen => f.write_str("Q"),
            Self::King => f.write_str("K"),
            other => write!(f, "{}", *other as u8 + 1),
        }
    }
}

/// A standard playing card, stored as its index in `0..52`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card(u8);

impl Card {
    /// Number of standard cards.
    pub const COUNT: u8 = 52;

    /// Creates a card from suit and rank.
    #[must_use]
    pub const fn new(suit: Suit, rank: Rank) -> Self {
        Self(suit as u8 * 13 + rank as u8)
    }

    /// Creates a card from its index, or `None` if `index >= 52`.
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < Self::COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Returns the index in `0..52`.
    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Returns the suit (`index / 13`).
    #[must_use]
    pub const fn suit(self) -> Suit {
        Suit::ALL[(self.0 / 13) as usize]
    }

    /// Returns the rank (`index % 13`).
    #[must_use]
    pub const fn rank(self) -> Rank {
        Rank::ALL[(self.0 % 13) as usize]
    }
}

impl FromStr for Card {
    type Err = ParseCardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let glyph = chars.next().ok_or(ParseCardError::Empty)?;
        let suit = Suit::from_glyph(glyph).ok_or(ParseCardError::Suit(glyph))?;
        let rank = Rank::from_token(chars.as_str()).ok_or(ParseCardError::Rank)?;
        Ok(Self::new(suit, rank))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.suit().glyph(), self.rank())
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Card({self})")
    }
}

/// What a sprite shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Face {
    /// A standard card face.
    Card(Card),
    /// A joker, by colour variant.
    Joker(u8),
    /// A card back, by colour variant.
    Back(u8),
}

impl Face {
    /// The default face-down texture.
    pub const BACK: Self = Self::Back(0);

    /// Maps a signed sprite index to a face.
    ///
    /// `0..52` are standard cards, `52..` are jokers (two indices per colour),
    /// negative values are card backs with variant `-index - 1`.
    #[must_use]
    pub fn from_index(index: i32) -> Self {
        let variant = |v: i32| u8::try_from(v).unwrap_or(u8::MAX);
        if index < 0 {
            Self::Back(variant(-(index + 1)))
        } else if index >= i32::from(Card::COUNT) {
            Self::Joker(variant((index - 52) / 2))
        } else {
            Self::Card(Card(variant(index)))
        }
    }
}

impl From<Card> for Face {
    fn from(card: Card) -> Self {
        Self::Card(card)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn parses_documented_offsets() {
        let cases = [
            ("♣A", 0),
            ("♣2", 1),
            ("♣10", 9),
            ("♣J", 10),
            ("♣Q", 11),
            ("♣K", 12),
            ("♥A", 13),
            ("♠5", 30),
            ("♦K", 51),
        ];
        for (token, index) in cases {
            let card: Card = token.parse().unwrap();
            assert_eq!(card.index(), index, "token {token}");
        }
    }

    #[test]
    fn all_tokens_round_trip_suit_and_rank() {
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                let token = Card::new(suit, rank).to_string();
                let card: Card = token.parse().unwrap();
                assert_eq!(card.suit(), suit, "suit of {token}");
                assert_eq!(card.rank(), rank, "rank of {token}");
                assert_eq!(card.to_string(), token);
            }
        }
    }

    #[test]
    fn rejects_bad_tokens() {
        assert_eq!("".parse::<Card>(), Err(ParseCardError::Empty));
        assert_eq!("X5".parse::<Card>(), Err(ParseCardError::Suit('X')));
        assert_eq!("♣1".parse::<Card>(), Err(ParseCardError::Rank));
        assert_eq!("♣11".parse::<Card>(), Err(ParseCardError::Rank));
        assert_eq!("♣".parse::<Card>(), Err(ParseCardError::Rank));
    }

    #[test]
    fn face_from_signed_index() {
        assert_eq!(Face::from_index(0), Face::Card(Card(0)));
        assert_eq!(Face::from_index(51), Face::Card(Card(51)));
        assert_eq!(Face::from_index(52), Face::Joker(0));
        assert_eq!(Face::from_index(53), Face::Joker(0));
        assert_eq!(Face::from_index(54), Face::Joker(1));
        assert_eq!(Face::from_index(-1), Face::Back(0));
        assert_eq!(Face::from_index(-3), Face::Back(2));
    }

    #[test]
    fn face_variants_saturate() {
        assert_eq!(Face::from_index(i32::MIN), Face::Back(u8::MAX));
        assert_eq!(Face::from_index(i32::MAX), Face::Joker(u8::MAX));
        assert_eq!(Face::from_index(52 + 2 * 300), Face::Joker(u8::MAX));
    }
}
