// Copyright 2026 the Fellestrekk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Localized labels, loaded from `/strings/<lang>.json`.
//!
//! Every field has a default, so a partial or missing file still yields a
//! usable table.

use alloc::string::String;

/// Localized labels used by the table.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct Strings {
    /// Word in front of a seat number in chat ("Player 2").
    pub player: String,
}

impl Default for Strings {
    fn default() -> Self {
        Self {
            player: String::from("Player"),
        }
    }
}
