// Copyright 2026 the Fellestrekk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wire format for both directions of the table socket.
//!
//! One command per WebSocket text frame, arguments separated by single
//! spaces. Inbound frames are matched by prefix in a fixed priority order
//! (see [`ServerMessage::parse`]); the prefixes of argument-carrying messages
//! include the trailing space.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use core::num::ParseIntError;

use crate::card::{Card, ParseCardError};

/// Errors from parsing a server message.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// The frame matches no known prefix.
    #[error("unknown message")]
    UnknownMessage,
    /// A required argument is absent.
    #[error("{message}: missing argument")]
    MissingArgument {
        /// Which message was being parsed.
        message: MessageKind,
    },
    /// A numeric argument did not parse.
    #[error("{message}: bad number")]
    BadNumber {
        /// Which message was being parsed.
        message: MessageKind,
        /// Underlying integer error.
        #[source]
        source: ParseIntError,
    },
    /// A card argument did not parse.
    #[error("{message}: bad card")]
    BadCard {
        /// Which message was being parsed.
        message: MessageKind,
        /// Underlying card error.
        #[source]
        source: ParseCardError,
    },
}

/// Which hand a `VALUEUPDATE` refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Seat {
    /// The dealer's hand.
    Dealer,
    /// The local player's hand.
    Player,
}

/// The tag of a [`ServerMessage`], for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// `PING`
    Ping,
    /// `HOST_OK`
    HostOk,
    /// `JOIN_OK`
    JoinOk,
    /// `LOSE`
    Lose,
    /// `WIN`
    Win,
    /// `DRAW`
    Draw,
    /// `TAKEMONEY`
    TakeMoney,
    /// `SENDMONEY`
    SendMoney,
    /// `DECKSIZE`
    DeckSize,
    /// `START`
    Start,
    /// `VALUEUPDATE`
    ValueUpdate,
    /// `STATUS`
    Status,
    /// `REVEALDOWNS`
    RevealDowns,
    /// `DOWNCARD`
    DownCard,
    /// `DEALERDRAW`
    DealerDraw,
    /// `PLAYERDRAW`
    PlayerDraw,
    /// `CHAT_MSG`
    ChatMsg,
}

impl MessageKind {
    /// Dispatch order together with each prefix.
    const PREFIXES: [(&'static str, Self); 17] = [
        ("PING", Self::Ping),
        ("HOST_OK", Self::HostOk),
        ("JOIN_OK", Self::JoinOk),
        ("LOSE", Self::Lose),
        ("WIN", Self::Win),
        ("DRAW", Self::Draw),
        ("TAKEMONEY ", Self::TakeMoney),
        ("SENDMONEY ", Self::SendMoney),
        ("DECKSIZE ", Self::DeckSize),
        ("START", Self::Start),
        ("VALUEUPDATE ", Self::ValueUpdate),
        ("STATUS ", Self::Status),
        ("REVEALDOWNS ", Self::RevealDowns),
        ("DOWNCARD ", Self::DownCard),
        ("DEALERDRAW ", Self::DealerDraw),
        ("PLAYERDRAW ", Self::PlayerDraw),
        ("CHAT_MSG ", Self::ChatMsg),
    ];

    /// The wire name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ping => "PING",
            Self::HostOk => "HOST_OK",
            Self::JoinOk => "JOIN_OK",
            Self::Lose => "LOSE",
            Self::Win => "WIN",
            Self::Draw => "DRAW",
            Self::TakeMoney => "TAKEMONEY",
            Self::SendMoney => "SENDMONEY",
            Self::DeckSize => "DECKSIZE",
            Self::Start => "START",
            Self::ValueUpdate => "VALUEUPDATE",
            Self::Status => "STATUS",
            Self::RevealDowns => "REVEALDOWNS",
            Self::DownCard => "DOWNCARD",
            Self::DealerDraw => "DEALERDRAW",
            Self::PlayerDraw => "PLAYERDRAW",
            Self::ChatMsg => "CHAT_MSG",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A parsed server → client message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ServerMessage {
    /// Keep-alive; answer with [`ClientCommand::Pong`].
    Ping,
    /// A hosted game was created.
    HostOk {
        /// Hex game code, if the server sent one.
        code: Option<String>,
    },
    /// Joined an existing game.
    JoinOk {
        /// Hex game code, if the server sent one.
        code: Option<String>,
    },
    /// The round was lost.
    Lose,
    /// The round was won.
    Win,
    /// The round was a push.
    Draw,
    /// Money leaves the balance.
    TakeMoney(i64),
    /// Money joins the balance.
    SendMoney(i64),
    /// Cards left in the shoe.
    DeckSize(u32),
    /// A new round begins.
    Start,
    /// A hand total changed.
    ValueUpdate {
        /// Whose hand.
        seat: Seat,
        /// The hard total.
        value: i64,
        /// Whether the hand holds an ace counted as 11.
        soft: bool,
    },
    /// Actions available to the player, as raw capability codes.
    Status(Vec<String>),
    /// The dealer's hole card is turned over.
    RevealDowns(Card),
    /// The player's face-down card.
    DownCard(Card),
    /// The dealer takes a card.
    DealerDraw(Card),
    /// A player takes a card.
    PlayerDraw {
        /// Seat number, if numeric.
        seat: Option<u32>,
        /// The card drawn.
        card: Card,
    },
    /// A chat line from another seat.
    ChatMsg {
        /// Raw sender token (a zero-based seat number in practice).
        sender: String,
        /// Message text; may be empty.
        body: String,
    },
}

impl ServerMessage {
    /// Parses one text frame.
    ///
    /// Prefixes are tried in dispatch order and the first match wins, so a
    /// frame such as `STARTED` is read as [`Start`](Self::Start).
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        let (kind, rest) = MessageKind::PREFIXES
            .iter()
            .find_map(|&(prefix, kind)| text.strip_prefix(prefix).map(|rest| (kind, rest)))
            .ok_or(ProtocolError::UnknownMessage)?;
        let mut args = rest.split(' ');

        let message = match kind {
            MessageKind::Ping => Self::Ping,
            MessageKind::HostOk => Self::HostOk {
                code: code_argument(rest),
            },
            MessageKind::JoinOk => Self::JoinOk {
                code: code_argument(rest),
            },
            MessageKind::Lose => Self::Lose,
            MessageKind::Win => Self::Win,
            MessageKind::Draw => Self::Draw,
            MessageKind::TakeMoney => Self::TakeMoney(number(kind, args.next())?),
            MessageKind::SendMoney => Self::SendMoney(number(kind, args.next())?),
            MessageKind::DeckSize => Self::DeckSize(number(kind, args.next())?),
            MessageKind::Start => Self::Start,
            MessageKind::ValueUpdate => parse_value_update(rest)?,
            MessageKind::Status => Self::Status(
                args.filter(|code| !code.is_empty())
                    .map(ToString::to_string)
                    .collect(),
            ),
            MessageKind::RevealDowns => Self::RevealDowns(card(kind, args.next())?),
            MessageKind::DownCard => Self::DownCard(card(kind, args.next())?),
            MessageKind::DealerDraw => Self::DealerDraw(card(kind, args.next())?),
            MessageKind::PlayerDraw => {
                let seat = args
                    .next()
                    .ok_or(ProtocolError::MissingArgument { message: kind })?;
                Self::PlayerDraw {
                    seat: seat.parse().ok(),
                    card: card(kind, args.next())?,
                }
            }
            MessageKind::ChatMsg => {
                let (sender, body) = rest.split_once(' ').unwrap_or((rest, ""));
                Self::ChatMsg {
                    sender: sender.to_string(),
                    body: body.to_string(),
                }
            }
        };
        Ok(message)
    }

    /// Returns the tag of this message.
    #[must_use]
    pub const fn kind(&self) -> MessageKind {
        match self {
            Self::Ping => MessageKind::Ping,
            Self::HostOk { .. } => MessageKind::HostOk,
            Self::JoinOk { .. } => MessageKind::JoinOk,
            Self::Lose => MessageKind::Lose,
            Self::Win => MessageKind::Win,
            Self::Draw => MessageKind::Draw,
            Self::TakeMoney(_) => MessageKind::TakeMoney,
            Self::SendMoney(_) => MessageKind::SendMoney,
            Self::DeckSize(_) => MessageKind::DeckSize,
            Self::Start => MessageKind::Start,
            Self::ValueUpdate { .. } => MessageKind::ValueUpdate,
            Self::Status(_) => MessageKind::Status,
            Self::RevealDowns(_) => MessageKind::RevealDowns,
            Self::DownCard(_) => MessageKind::DownCard,
            Self::DealerDraw(_) => MessageKind::DealerDraw,
            Self::PlayerDraw { .. } => MessageKind::PlayerDraw,
            Self::ChatMsg { .. } => MessageKind::ChatMsg,
        }
    }
}

/// `HOST_OK 1A2B` → `Some("1A2B")`; a bare `HOST_OK` → `None`.
fn code_argument(rest: &str) -> Option<String> {
    rest.split(' ')
        .find(|s| !s.is_empty())
        .map(ToString::to_string)
}

fn number<T>(message: MessageKind, arg: Option<&str>) -> Result<T, ProtocolError>
where
    T: core::str::FromStr<Err = ParseIntError>,
{
    arg.ok_or(ProtocolError::MissingArgument { message })?
        .parse()
        .map_err(|source| ProtocolError::BadNumber { message, source })
}

fn card(message: MessageKind, arg: Option<&str>) -> Result<Card, ProtocolError> {
    arg.ok_or(ProtocolError::MissingArgument { message })?
        .parse()
        .map_err(|source| ProtocolError::BadCard { message, source })
}

/// `VALUEUPDATE [seat] value [soft]`
///
/// The value is the last argument, or the one before a trailing `soft`. Any
/// argument in front of the value means the update is for the player.
fn parse_value_update(rest: &str) -> Result<ServerMessage, ProtocolError> {
    let message = MessageKind::ValueUpdate;
    let args: Vec<&str> = rest.split(' ').collect();
    let soft = args.last() == Some(&"soft");
    let value_args = if soft { 2 } else { 1 };
    let value_index = args
        .len()
        .checked_sub(value_args)
        .ok_or(ProtocolError::MissingArgument { message })?;
    let value = number(message, Some(args[value_index]))?;
    let seat = if args.len() > value_args {
        Seat::Player
    } else {
        Seat::Dealer
    };
    Ok(ServerMessage::ValueUpdate { seat, value, soft })
}

/// A client → server command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClientCommand {
    /// Create a game of the named type.
    Host(String),
    /// Join a game by hex code.
    Join(String),
    /// Place a bet.
    Bet(u32),
    /// Start the round.
    Start,
    /// Take a card.
    Hit,
    /// Keep the hand.
    Stand,
    /// Double the bet and take one card.
    DoubleDown,
    /// Give up half the bet.
    Surrender,
    /// Split a pair.
    Split,
    /// Send a chat line.
    Chat(String),
    /// Answer to [`ServerMessage::Ping`].
    Pong,
}

impl fmt::Display for ClientCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Host(game) => write!(f, "HOST {game}"),
            Self::Join(code) => write!(f, "JOIN {code}"),
            Self::Bet(amount) => write!(f, "BET {amount}"),
            Self::Start => f.write_str("START"),
            Self::Hit => f.write_str("HIT"),
            Self::Stand => f.write_str("STAND"),
            Self::DoubleDown => f.write_str("DOUBLEDOWN"),
            Self::Surrender => f.write_str("SURRENDER"),
            Self::Split => f.write_str("SPLIT"),
            Self::Chat(text) => write!(f, "CHAT {text}"),
            Self::Pong => f.write_str("PONG"),
        }
    }
}

/// An action the server currently allows, as listed by `STATUS`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    /// `H`
    Hit,
    /// `S`
    Stand,
    /// `D`
    DoubleDown,
    /// `U`
    Surrender,
    /// `P`
    Split,
    /// `N`
    NewGame,
}

impl Capability {
    /// Looks up a single-letter code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Some(match code {
            "H" => Self::Hit,
            "S" => Self::Stand,
            "D" => Self::DoubleDown,
            "U" => Self::Surrender,
            "P" => Self::Split,
            "N" => Self::NewGame,
            _ => return None,
        })
    }

    /// The status-bar label, with the hotkey in brackets.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Hit => "[H]it",
            Self::Stand => "[S]tand",
            Self::DoubleDown => "[D]ouble down",
            Self::Surrender => "S[U]rrender",
            Self::Split => "S[P]lit",
            Self::NewGame => "[N]ew game",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use crate::card::{Rank, Suit};

    #[test]
    fn bare_keywords() {
        assert_eq!(ServerMessage::parse("PING"), Ok(ServerMessage::Ping));
        assert_eq!(ServerMessage::parse("START"), Ok(ServerMessage::Start));
        assert_eq!(ServerMessage::parse("WIN"), Ok(ServerMessage::Win));
        assert_eq!(ServerMessage::parse("LOSE"), Ok(ServerMessage::Lose));
        assert_eq!(ServerMessage::parse("DRAW"), Ok(ServerMessage::Draw));
    }

    #[test]
    fn prefix_match_ignores_trailing_text() {
        assert_eq!(ServerMessage::parse("PINGPONG"), Ok(ServerMessage::Ping));
        assert_eq!(ServerMessage::parse("WIN 20"), Ok(ServerMessage::Win));
    }

    #[test]
    fn host_ok_code_is_optional() {
        assert_eq!(
            ServerMessage::parse("HOST_OK 1F"),
            Ok(ServerMessage::HostOk {
                code: Some("1F".into())
            })
        );
        assert_eq!(
            ServerMessage::parse("HOST_OK"),
            Ok(ServerMessage::HostOk { code: None })
        );
        assert_eq!(
            ServerMessage::parse("JOIN_OK A0 extra"),
            Ok(ServerMessage::JoinOk {
                code: Some("A0".into())
            })
        );
    }

    #[test]
    fn money_and_deck_numbers() {
        assert_eq!(
            ServerMessage::parse("TAKEMONEY 100"),
            Ok(ServerMessage::TakeMoney(100))
        );
        assert_eq!(
            ServerMessage::parse("SENDMONEY 250"),
            Ok(ServerMessage::SendMoney(250))
        );
        assert_eq!(
            ServerMessage::parse("DECKSIZE 260"),
            Ok(ServerMessage::DeckSize(260))
        );
        assert!(matches!(
            ServerMessage::parse("DECKSIZE lots"),
            Err(ProtocolError::BadNumber {
                message: MessageKind::DeckSize,
                ..
            })
        ));
    }

    #[test]
    fn keyword_without_required_space_is_unknown() {
        assert_eq!(
            ServerMessage::parse("DECKSIZE"),
            Err(ProtocolError::UnknownMessage)
        );
        assert_eq!(
            ServerMessage::parse("HELLO"),
            Err(ProtocolError::UnknownMessage)
        );
    }

    #[test]
    fn value_update_seat_and_softness() {
        assert_eq!(
            ServerMessage::parse("VALUEUPDATE 18 soft"),
            Ok(ServerMessage::ValueUpdate {
                seat: Seat::Dealer,
                value: 18,
                soft: true
            })
        );
        assert_eq!(
            ServerMessage::parse("VALUEUPDATE 0 18 soft"),
            Ok(ServerMessage::ValueUpdate {
                seat: Seat::Player,
                value: 18,
                soft: true
            })
        );
        assert_eq!(
            ServerMessage::parse("VALUEUPDATE 0 21"),
            Ok(ServerMessage::ValueUpdate {
                seat: Seat::Player,
                value: 21,
                soft: false
            })
        );
        assert_eq!(
            ServerMessage::parse("VALUEUPDATE 17"),
            Ok(ServerMessage::ValueUpdate {
                seat: Seat::Dealer,
                value: 17,
                soft: false
            })
        );
    }

    #[test]
    fn status_keeps_raw_codes() {
        assert_eq!(
            ServerMessage::parse("STATUS H S X"),
            Ok(ServerMessage::Status(vec!["H".into(), "S".into(), "X".into()]))
        );
    }

    #[test]
    fn card_messages() {
        let ace_of_clubs = Card::new(Suit::Clubs, Rank::Ace);
        assert_eq!(
            ServerMessage::parse("DEALERDRAW ♣A"),
            Ok(ServerMessage::DealerDraw(ace_of_clubs))
        );
        assert_eq!(
            ServerMessage::parse("REVEALDOWNS ♥10 0 1"),
            Ok(ServerMessage::RevealDowns(Card::new(Suit::Hearts, Rank::Ten)))
        );
        assert_eq!(
            ServerMessage::parse("PLAYERDRAW 0 ♠Q"),
            Ok(ServerMessage::PlayerDraw {
                seat: Some(0),
                card: Card::new(Suit::Spades, Rank::Queen)
            })
        );
        assert!(matches!(
            ServerMessage::parse("DOWNCARD ?"),
            Err(ProtocolError::BadCard {
                message: MessageKind::DownCard,
                ..
            })
        ));
        assert!(matches!(
            ServerMessage::parse("PLAYERDRAW 0"),
            Err(ProtocolError::MissingArgument {
                message: MessageKind::PlayerDraw
            })
        ));
    }

    #[test]
    fn chat_splits_sender_from_body() {
        assert_eq!(
            ServerMessage::parse("CHAT_MSG 2 good luck all"),
            Ok(ServerMessage::ChatMsg {
                sender: "2".into(),
                body: "good luck all".into()
            })
        );
        assert_eq!(
            ServerMessage::parse("CHAT_MSG 2"),
            Ok(ServerMessage::ChatMsg {
                sender: "2".into(),
                body: String::new()
            })
        );
    }

    #[test]
    fn client_commands_encode() {
        let cases = [
            (ClientCommand::Host("BLACKJACK".into()), "HOST BLACKJACK"),
            (ClientCommand::Join("1F".into()), "JOIN 1F"),
            (ClientCommand::Bet(100), "BET 100"),
            (ClientCommand::DoubleDown, "DOUBLEDOWN"),
            (ClientCommand::Chat("hi there".into()), "CHAT hi there"),
            (ClientCommand::Pong, "PONG"),
        ];
        for (command, wire) in cases {
            assert_eq!(command.to_string(), wire);
        }
    }

    #[test]
    fn capability_codes() {
        assert_eq!(Capability::from_code("U"), Some(Capability::Surrender));
        assert_eq!(Capability::from_code("Z"), None);
        assert_eq!(Capability::Split.label(), "S[P]lit");
    }
}
