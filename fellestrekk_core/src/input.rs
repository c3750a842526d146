// Copyright 2026 the Fellestrekk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyboard mapping.
//!
//! Keys are identified by their physical `KeyboardEvent.code` (`"KeyH"`), so
//! the bindings do not move with the keyboard layout.

use crate::protocol::ClientCommand;

/// What a key press means at the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
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
    /// `N`: bet the auto-bet and start a round.
    NewGame,
    /// Any other key: fast-forward the current animation.
    Skip,
}

impl KeyAction {
    /// Maps a `KeyboardEvent.code`.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "KeyH" => Self::Hit,
            "KeyS" => Self::Stand,
            "KeyD" => Self::DoubleDown,
            "KeyU" => Self::Surrender,
            "KeyP" => Self::Split,
            "KeyN" => Self::NewGame,
            _ => Self::Skip,
        }
    }

    /// The single command for a gameplay key. `NewGame` sends two commands
    /// and `Skip` none; both return `None`.
    #[must_use]
    pub const fn command(self) -> Option<ClientCommand> {
        match self {
            Self::Hit => Some(ClientCommand::Hit),
            Self::Stand => Some(ClientCommand::Stand),
            Self::DoubleDown => Some(ClientCommand::DoubleDown),
            Self::Surrender => Some(ClientCommand::Surrender),
            Self::Split => Some(ClientCommand::Split),
            Self::NewGame | Self::Skip => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gameplay_keys() {
        assert_eq!(KeyAction::from_code("KeyH"), KeyAction::Hit);
        assert_eq!(KeyAction::from_code("KeyP"), KeyAction::Split);
        assert_eq!(KeyAction::from_code("KeyN"), KeyAction::NewGame);
        assert_eq!(KeyAction::Stand.command(), Some(ClientCommand::Stand));
    }

    #[test]
    fn everything_else_skips() {
        for code in ["Space", "Enter", "KeyA", "h", ""] {
            assert_eq!(KeyAction::from_code(code), KeyAction::Skip, "code {code:?}");
        }
        assert_eq!(KeyAction::Skip.command(), None);
    }
}
