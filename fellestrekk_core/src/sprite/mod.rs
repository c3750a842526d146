// Copyright 2026 the Fellestrekk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sprite data model.
//!
//! A *sprite* is one card image on the table. Each sprite has:
//!
//! - An identity ([`SpriteId`]), a generational handle that becomes stale when
//!   the sprite is destroyed, so an animation still holding the handle can
//!   tell that its card is gone.
//! - **Properties** set by the scene and the animation queue:
//!   [`position`](SpriteStore::set_position), [`width`](SpriteStore::set_width),
//!   [`face`](SpriteStore::set_face) and [`z_index`](SpriteStore::shift_z_index).
//!
//! Sprites are stored in struct-of-arrays layout with index-based handles.
//!
//! # Change tracking
//!
//! Every setter records which channel of the slot changed. Once per render
//! callback, [`evaluate`](SpriteStore::evaluate) drains those records into a
//! [`FrameChanges`] for the presenter:
//!
//! - **GEOMETRY**: position or width.
//! - **FACE**: the texture cell.
//! - **STACKING**: the z-index.

mod evaluate;
mod id;
mod store;

pub use evaluate::FrameChanges;
pub use id::SpriteId;
pub use store::SpriteStore;
