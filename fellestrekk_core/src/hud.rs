// Copyright 2026 the Fellestrekk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text overlays and the chat backlog.
//!
//! HUD fields change immediately when a message arrives; they are never
//! animated. Setters raise a dirty flag so presenters rewrite the DOM only on
//! frames where something changed.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

/// One line for the chat panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatLine {
    /// Shown in bold before the body, if present.
    pub sender: Option<String>,
    /// Message text.
    pub body: String,
    /// CSS class for the body, if any.
    pub class: Option<&'static str>,
}

impl ChatLine {
    /// CSS class for lines the client itself posts.
    pub const SYSTEM_CLASS: &'static str = "system";

    /// A line from another seat.
    #[must_use]
    pub fn from_sender(sender: String, body: String) -> Self {
        Self {
            sender: Some(sender),
            body,
            class: None,
        }
    }

    /// A line generated by the client.
    #[must_use]
    pub fn system(body: String) -> Self {
        Self {
            sender: None,
            body,
            class: Some(Self::SYSTEM_CLASS),
        }
    }
}

/// Balance, status and hand-value texts plus pending chat lines.
#[derive(Clone, Debug)]
pub struct Hud {
    balance: i64,
    auto_bet: u32,
    status: String,
    dealer_value: String,
    player_value: String,
    chat: Vec<ChatLine>,
    dirty: bool,
}

impl Hud {
    /// Status text shown before the first `STATUS`.
    pub const INITIAL_STATUS: &'static str = "[H]it [S]tand";
    /// Hand-value text shown before the first `VALUEUPDATE`.
    pub const INITIAL_VALUE: &'static str = "Value: ";

    /// Creates the HUD for a fresh session.
    #[must_use]
    pub fn new(balance: i64, auto_bet: u32) -> Self {
        Self {
            balance,
            auto_bet,
            status: String::from(Self::INITIAL_STATUS),
            dealer_value: String::from(Self::INITIAL_VALUE),
            player_value: String::from(Self::INITIAL_VALUE),
            chat: Vec::new(),
            dirty: true,
        }
    }

    /// Current balance.
    #[must_use]
    pub const fn balance(&self) -> i64 {
        self.balance
    }

    /// Amount bet automatically at the start of each round.
    #[must_use]
    pub const fn auto_bet(&self) -> u32 {
        self.auto_bet
    }

    /// Adds `difference` (negative to take) to the balance.
    pub fn adjust_balance(&mut self, difference: i64) {
        self.balance = self.balance.saturating_add(difference);
        self.dirty = true;
    }

    /// The balance panel: balance and auto-bet on two lines.
    #[must_use]
    pub fn balance_text(&self) -> String {
        format!("Balance: ${}\nAuto-bet: ${}", self.balance, self.auto_bet)
    }

    /// The action bar.
    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Replaces the action bar.
    pub fn set_status(&mut self, status: String) {
        self.status = status;
        self.dirty = true;
    }

    /// Puts `phrase` in front of the current action bar.
    pub fn prefix_status(&mut self, phrase: &str) {
        self.status.insert_str(0, phrase);
        self.dirty = true;
    }

    /// The dealer's hand-value text.
    #[must_use]
    pub fn dealer_value(&self) -> &str {
        &self.dealer_value
    }

    /// The player's hand-value text.
    #[must_use]
    pub fn player_value(&self) -> &str {
        &self.player_value
    }

    /// Replaces the dealer's hand-value text.
    pub fn set_dealer_value(&mut self, text: String) {
        self.dealer_value = text;
        self.dirty = true;
    }

    /// Replaces the player's hand-value text.
    pub fn set_player_value(&mut self, text: String) {
        self.player_value = text;
        self.dirty = true;
    }

    /// Queues a line for the chat panel.
    pub fn push_chat(&mut self, line: ChatLine) {
        self.chat.push(line);
    }

    /// Chat lines not yet handed to a presenter.
    #[must_use]
    pub fn pending_chat(&self) -> &[ChatLine] {
        &self.chat
    }

    /// Hands over the queued chat lines.
    pub fn take_chat(&mut self) -> Vec<ChatLine> {
        core::mem::take(&mut self.chat)
    }

    /// Whether any text changed since the last [`mark_clean`](Self::mark_clean).
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clears the dirty flag once a presenter has drawn the texts.
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }
}

/// Formats a `VALUEUPDATE` for display: `Value: 18`, or `Value: 18 or 8` for
/// a soft hand.
#[must_use]
pub fn value_text(value: i64, soft: bool) -> String {
    if soft {
        format!("Value: {value} or {}", value - 10)
    } else {
        format!("Value: {value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balance_text_shows_auto_bet() {
        let mut hud = Hud::new(1000, 100);
        hud.adjust_balance(-100);
        assert_eq!(hud.balance_text(), "Balance: $900\nAuto-bet: $100");
    }

    #[test]
    fn prefix_keeps_existing_status() {
        let mut hud = Hud::new(0, 0);
        hud.set_status(String::from(" [N]ew game"));
        hud.prefix_status("You won!!!  ");
        assert_eq!(hud.status(), "You won!!!   [N]ew game");
    }

    #[test]
    fn dirty_flag_tracks_text_changes() {
        let mut hud = Hud::new(0, 0);
        assert!(hud.is_dirty(), "fresh HUD needs a first draw");
        hud.mark_clean();
        hud.push_chat(ChatLine::system(String::from("hi")));
        assert!(!hud.is_dirty(), "chat lines are drained separately");
        hud.set_dealer_value(value_text(18, true));
        assert!(hud.is_dirty());
        assert_eq!(hud.dealer_value(), "Value: 18 or 8");
        assert_eq!(hud.take_chat().len(), 1);
        assert!(hud.pending_chat().is_empty());
    }
}
