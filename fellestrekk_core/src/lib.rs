// Copyright 2026 the Fellestrekk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Animation queue, frame clock and protocol translation for a blackjack
//! table client.
//!
//! `fellestrekk_core` is the presentation engine behind the fellestrekk
//! browser table. The game server deals; this crate only turns the server's
//! text messages into sprites, animations and HUD text. It is `no_std`
//! compatible (with `alloc`) so the same engine runs under wasm and in plain
//! host tests.
//!
//! # Architecture
//!
//! ```text
//!   WebSocket text ──► Table::handle_server_message()
//!                          │            │
//!                          │            └──► Hud (balance, status, values, chat)
//!                          ▼
//!                   AnimationQueue::enqueue()
//!
//!   Backend tick ──► FixedStep::update() ──► Table::logic_step() × n
//!                                                │
//!                                                ▼
//!                                  AnimationQueue::advance() ──► SpriteStore
//!                                                                    │
//!                 ┌──────────────────────────────────────────────────┘
//!                 ▼
//!   SpriteStore::evaluate() ──► FrameChanges ──► Presenter::apply()
//! ```
//!
//! **[`timing`]**: Fixed-step frame clock that turns variable render
//! callbacks into 1/60 s logic steps, capped per callback.
//!
//! **[`animation`]**: Card motions, one-shot deferred actions, and the FIFO
//! queue that advances exactly one head entry at a time.
//!
//! **[`sprite`]**: Struct-of-arrays sprite storage with generational
//! handles, so animations referencing removed cards are detected instead of
//! mutating dead state.
//!
//! **[`table`]**: The session: owns the scene, HUD and queue, and maps each
//! [`ServerMessage`](protocol::ServerMessage) to state changes.
//!
//! **[`protocol`]**: Wire format for both directions.
//!
//! **[`card`]** / **[`atlas`]**: Card token codec and sprite-sheet lookup.
//!
//! **[`backend`]**: The [`Presenter`](backend::Presenter) trait that
//! platform backends implement.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) events for diagnostics,
//! with a zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod animation;
pub mod atlas;
pub mod backend;
pub mod card;
pub mod config;
pub mod hud;
pub mod input;
pub mod protocol;
pub mod scene;
pub mod sprite;
pub mod strings;
pub mod table;
pub mod time;
pub mod timing;
pub mod trace;
