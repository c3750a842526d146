// Copyright 2026 the Fellestrekk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The table session: protocol translation and the logic loop.
//!
//! A [`Table`] owns everything the client knows about the game: the
//! [`Scene`], the [`Hud`], the [`AnimationQueue`] and the frame clock. It has
//! three inputs and one output:
//!
//! - [`handle_server_message`](Table::handle_server_message): one WebSocket
//!   text frame in, replies out. HUD changes apply at once; card movement is
//!   queued.
//! - [`key_down`](Table::key_down): one key press in, commands out. Keys that
//!   are not bound to a game action fast-forward the current animation.
//! - [`on_render_frame`](Table::on_render_frame): one render callback; runs
//!   the fixed-step logic loop.
//! - [`present`](Table::present): hands the frame's sprite changes and the
//!   HUD to a [`Presenter`].
//!
//! # Usage
//!
//! ```rust
//! use fellestrekk_core::config::TableConfig;
//! use fellestrekk_core::protocol::ClientCommand;
//! use fellestrekk_core::strings::Strings;
//! use fellestrekk_core::table::Table;
//!
//! let mut table = Table::new(TableConfig::web(), Strings::default());
//! assert_eq!(table.handle_server_message("PING"), [ClientCommand::Pong]);
//!
//! table.handle_server_message("DECKSIZE 260");
//! table.handle_server_message("PLAYERDRAW 0 ♠A");
//! assert_eq!(table.queue_len(), 1);
//!
//! // One second of render callbacks plays the deal.
//! for _ in 0..60 {
//!     table.on_render_frame(1.0 / 60.0);
//! }
//! assert_eq!(table.queue_len(), 0);
//! ```

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Point;

use crate::animation::{Action, AnimationQueue, CardMotion, Timing};
use crate::backend::{Frame, Presenter};
use crate::card::{Card, Face};
use crate::config::TableConfig;
use crate::hud::{ChatLine, Hud, value_text};
use crate::input::KeyAction;
use crate::protocol::{Capability, ClientCommand, Seat, ServerMessage};
use crate::scene::Scene;
use crate::sprite::{FrameChanges, SpriteStore};
use crate::strings::Strings;
use crate::timing::{FixedStep, StepReport};
use crate::trace::{
    CommandEvent, IgnoreReason, IgnoredMessageEvent, MessageEvent, StepsEvent, Tracer,
    UnknownCapabilityEvent,
};

/// Game type requested when hosting.
pub const GAME: &str = "BLACKJACK";

const LOSE_PHRASE: &str = "You lost! :( ";
const WIN_PHRASE: &str = "You won!!!  ";
const DRAW_PHRASE: &str = "You tied! You get the bet back. ";

/// One client's view of a blackjack table.
#[derive(Debug)]
pub struct Table {
    config: TableConfig,
    strings: Strings,
    scene: Scene,
    hud: Hud,
    queue: AnimationQueue,
    clock: FixedStep,
    force_finish: bool,
    game_code: Option<String>,
    changes: FrameChanges,
}

impl Table {
    /// Creates an empty table.
    #[must_use]
    pub fn new(config: TableConfig, strings: Strings) -> Self {
        Self {
            scene: Scene::new(config.layout, Timing::BySpeed(config.draw_speed)),
            hud: Hud::new(config.starting_balance, config.auto_bet),
            queue: AnimationQueue::new(),
            clock: FixedStep::new(config.fixed_step),
            force_finish: false,
            game_code: None,
            changes: FrameChanges::default(),
            config,
            strings,
        }
    }

    /// The session configuration.
    #[must_use]
    pub const fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Replaces the localized labels (they usually arrive after the socket
    /// opens).
    pub fn set_strings(&mut self, strings: Strings) {
        self.strings = strings;
    }

    /// The hex code of the game this client hosts or joined, once known.
    #[must_use]
    pub fn game_code(&self) -> Option<&str> {
        self.game_code.as_deref()
    }

    // -- Outbound --

    /// The first command to send once the socket is open: join the game
    /// named by `join_code` (the page's `?code=`), or host a new one.
    pub fn open_commands(&mut self, join_code: Option<&str>) -> Vec<ClientCommand> {
        match join_code {
            Some(code) => {
                self.game_code = Some(String::from(code));
                alloc::vec![ClientCommand::Join(String::from(code))]
            }
            None => alloc::vec![ClientCommand::Host(String::from(GAME))],
        }
    }

    /// The command for a line typed into the chat box.
    #[must_use]
    pub fn chat_command(text: &str) -> ClientCommand {
        ClientCommand::Chat(String::from(text))
    }

    // -- Inbound --

    /// Applies one server text frame. Returns the replies to send, in order.
    pub fn handle_server_message(&mut self, text: &str) -> Vec<ClientCommand> {
        self.handle_server_message_traced(text, &mut Tracer::none())
    }

    /// Like [`handle_server_message`](Self::handle_server_message), reporting
    /// to `tracer`.
    pub fn handle_server_message_traced(
        &mut self,
        text: &str,
        tracer: &mut Tracer<'_>,
    ) -> Vec<ClientCommand> {
        let mut replies = Vec::new();
        match ServerMessage::parse(text) {
            Ok(message) => {
                tracer.message(&MessageEvent {
                    text,
                    kind: message.kind(),
                });
                self.apply(text, message, &mut replies, tracer);
            }
            Err(error) => tracer.message_ignored(&IgnoredMessageEvent {
                text,
                reason: IgnoreReason::Malformed(&error),
            }),
        }
        replies
    }

    fn apply(
        &mut self,
        text: &str,
        message: ServerMessage,
        replies: &mut Vec<ClientCommand>,
        tracer: &mut Tracer<'_>,
    ) {
        match message {
            ServerMessage::Ping => send(replies, ClientCommand::Pong, tracer),
            ServerMessage::HostOk { code } => {
                if let Some(code) = code {
                    self.hud
                        .push_chat(ChatLine::system(format!("Game code: {code}")));
                    self.game_code = Some(code);
                }
                send(replies, ClientCommand::Bet(self.config.auto_bet), tracer);
                send(replies, ClientCommand::Start, tracer);
            }
            ServerMessage::JoinOk { code } => {
                if let Some(code) = code {
                    self.hud
                        .push_chat(ChatLine::system(format!("Joined game {code}")));
                    self.game_code = Some(code);
                }
            }
            ServerMessage::Lose => self.hud.prefix_status(LOSE_PHRASE),
            ServerMessage::Win => self.hud.prefix_status(WIN_PHRASE),
            ServerMessage::Draw => self.hud.prefix_status(DRAW_PHRASE),
            ServerMessage::TakeMoney(amount) => self.hud.adjust_balance(amount.saturating_neg()),
            ServerMessage::SendMoney(amount) => self.hud.adjust_balance(amount),
            ServerMessage::DeckSize(cards) => {
                let divisor = self.config.deck_divisor.max(1);
                let target = cards.div_ceil(divisor);
                self.scene
                    .set_deck_size(usize::try_from(target).unwrap_or(usize::MAX));
            }
            ServerMessage::Start => self.scene.clear_hands(),
            ServerMessage::ValueUpdate { seat, value, soft } => {
                let text = value_text(value, soft);
                match seat {
                    Seat::Dealer => self.hud.set_dealer_value(text),
                    Seat::Player => self.hud.set_player_value(text),
                }
            }
            ServerMessage::Status(codes) => {
                let mut status = String::new();
                for code in &codes {
                    match Capability::from_code(code) {
                        Some(capability) => {
                            status.push(' ');
                            status.push_str(capability.label());
                        }
                        None => tracer.unknown_capability(&UnknownCapabilityEvent { code }),
                    }
                }
                self.hud.set_status(status);
            }
            ServerMessage::RevealDowns(card) => self.reveal_hole_card(text, card, tracer),
            ServerMessage::DownCard(card) => {
                let target = self.config.layout.player_slot(0);
                self.draw_into_player(target, card, tracer);
                if self.scene.dealer.is_empty() {
                    self.draw_dealer_hole_card(tracer);
                }
            }
            ServerMessage::DealerDraw(card) => {
                if self.scene.dealer.is_empty() {
                    self.draw_dealer_hole_card(tracer);
                }
                self.queue.enqueue_traced(
                    Action::DealDealerCard {
                        face: Face::Card(card),
                    },
                    tracer,
                );
            }
            ServerMessage::PlayerDraw { card, .. } => {
                let target = self.config.layout.player_slot(self.scene.player.len());
                self.draw_into_player(target, card, tracer);
            }
            ServerMessage::ChatMsg { sender, body } => {
                let seat = match sender.parse::<u32>() {
                    Ok(n) => format!("{}", u64::from(n) + 1),
                    Err(_) => sender,
                };
                let name = format!("{} {seat}", self.strings.player);
                self.hud.push_chat(ChatLine::from_sender(name, body));
            }
        }
    }

    fn draw_into_player(&mut self, target: Point, card: Card, tracer: &mut Tracer<'_>) {
        let (sprite, motion) = self.scene.draw_card(target, Some(Face::Card(card)));
        self.queue.enqueue_traced(motion, tracer);
        self.scene.player.push(sprite);
    }

    fn draw_dealer_hole_card(&mut self, tracer: &mut Tracer<'_>) {
        let target = self.config.layout.dealer_slot(0);
        let (sprite, motion) = self.scene.draw_card(target, None);
        self.queue.enqueue_traced(motion, tracer);
        self.scene.dealer.push(sprite);
    }

    /// Lift the hole card above its neighbours, flip it on the way up, then
    /// drop it below them and slide it back into the dealer row.
    fn reveal_hole_card(&mut self, text: &str, card: Card, tracer: &mut Tracer<'_>) {
        let Some(&hole) = self.scene.dealer.first() else {
            tracer.message_ignored(&IgnoredMessageEvent {
                text,
                reason: IgnoreReason::NoHoleCard,
            });
            return;
        };
        let layout = &self.config.layout;
        self.queue
            .enqueue_traced(Action::Restack { sprite: hole, delta: 1 }, tracer);
        if self.scene.sprites.is_alive(hole) {
            let lift = CardMotion::new(
                &self.scene.sprites,
                hole,
                layout.reveal_lift,
                Timing::Fixed(self.config.reveal_secs),
                Some(Face::Card(card)),
            );
            self.queue.enqueue_traced(lift, tracer);
        }
        self.queue.enqueue_traced(
            Action::RestackThenSlide {
                sprite: hole,
                delta: -2,
                target: layout.dealer_slot(0),
                timing: Timing::Fixed(self.config.settle_secs),
            },
            tracer,
        );
    }

    /// Handles a key press identified by `KeyboardEvent.code`. Returns the
    /// commands to send.
    pub fn key_down(&mut self, code: &str) -> Vec<ClientCommand> {
        self.key_down_traced(code, &mut Tracer::none())
    }

    /// Like [`key_down`](Self::key_down), reporting to `tracer`.
    pub fn key_down_traced(&mut self, code: &str, tracer: &mut Tracer<'_>) -> Vec<ClientCommand> {
        let mut commands = Vec::new();
        let action = KeyAction::from_code(code);
        match action {
            KeyAction::NewGame => {
                send(&mut commands, ClientCommand::Bet(self.config.auto_bet), tracer);
                send(&mut commands, ClientCommand::Start, tracer);
            }
            KeyAction::Skip => self.force_finish = true,
            _ => {
                if let Some(command) = action.command() {
                    send(&mut commands, command, tracer);
                }
            }
        }
        if self.queue.len() > 1 {
            self.force_finish = true;
        }
        commands
    }

    // -- Logic loop --

    /// Runs one fixed logic step of `dt` seconds.
    ///
    /// A pending force-finish is consumed by this step.
    pub fn logic_step(&mut self, dt: f64) {
        self.logic_step_traced(dt, &mut Tracer::none());
    }

    /// Like [`logic_step`](Self::logic_step), reporting to `tracer`.
    pub fn logic_step_traced(&mut self, dt: f64, tracer: &mut Tracer<'_>) {
        let force = core::mem::take(&mut self.force_finish);
        self.queue.advance_traced(&mut self.scene, dt, force, tracer);
    }

    /// Feeds one render callback of `delta` seconds to the frame clock and
    /// runs the resulting logic steps.
    pub fn on_render_frame(&mut self, delta: f64) -> StepReport {
        self.on_render_frame_traced(delta, &mut Tracer::none())
    }

    /// Like [`on_render_frame`](Self::on_render_frame), reporting to
    /// `tracer`.
    pub fn on_render_frame_traced(&mut self, delta: f64, tracer: &mut Tracer<'_>) -> StepReport {
        let Self {
            clock,
            queue,
            scene,
            force_finish,
            ..
        } = self;
        let report = clock.update(delta, |dt| {
            let force = core::mem::take(force_finish);
            queue.advance_traced(scene, dt, force, tracer);
        });
        tracer.steps(&StepsEvent {
            frame_delta: delta,
            report,
            queue_len: self.queue.len(),
        });
        report
    }

    // -- Presentation --

    /// Drains the sprite changes accumulated since the previous call.
    pub fn evaluate(&mut self) -> FrameChanges {
        self.scene.sprites.evaluate()
    }

    /// Hands this frame's sprite changes and the HUD to `presenter`, then
    /// clears the HUD dirty flag and the delivered chat lines.
    pub fn present<P: Presenter + ?Sized>(&mut self, presenter: &mut P) {
        self.scene.sprites.evaluate_into(&mut self.changes);
        presenter.apply(&Frame {
            sprites: &self.scene.sprites,
            changes: &self.changes,
            hud: &self.hud,
        });
        self.hud.mark_clean();
        self.hud.take_chat();
    }

    /// All sprites.
    #[must_use]
    pub fn sprites(&self) -> &SpriteStore {
        &self.scene.sprites
    }

    /// The card collections.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Overlay texts.
    #[must_use]
    pub fn hud(&self) -> &Hud {
        &self.hud
    }

    /// Overlay texts, mutably (for presenters that drain chat lines
    /// themselves).
    pub fn hud_mut(&mut self) -> &mut Hud {
        &mut self.hud
    }

    /// Entries waiting in the animation queue.
    #[must_use]
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Whether the next logic step will fast-forward.
    #[must_use]
    pub const fn force_finish_pending(&self) -> bool {
        self.force_finish
    }
}

fn send(out: &mut Vec<ClientCommand>, command: ClientCommand, tracer: &mut Tracer<'_>) {
    tracer.command(&CommandEvent { command: &command });
    out.push(command);
}
