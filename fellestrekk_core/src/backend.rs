// Copyright 2026 the Fellestrekk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The contract between the table session and a platform presenter.
//!
//! A presenter owns whatever the platform uses to show sprites (DOM nodes,
//! textures) and keeps it in sync with the [`SpriteStore`] by applying the
//! [`FrameChanges`] of each render callback. The core never calls into the
//! platform any other way.

use crate::hud::Hud;
use crate::sprite::{FrameChanges, SpriteStore};

/// Everything a presenter needs for one render callback.
#[derive(Debug)]
pub struct Frame<'a> {
    /// Current sprite state, indexed by the slots in `changes`.
    pub sprites: &'a SpriteStore,
    /// What changed since the previous frame.
    pub changes: &'a FrameChanges,
    /// Overlay texts and pending chat lines.
    pub hud: &'a Hud,
}

/// Applies frames to a platform surface.
///
/// Implementations apply, in order: removals, additions, geometry changes,
/// face changes, restacks, then the HUD texts (when
/// [`Hud::is_dirty`] is set) and the pending chat lines.
pub trait Presenter {
    /// Brings the surface up to date with `frame`.
    fn apply(&mut self, frame: &Frame<'_>);
}
