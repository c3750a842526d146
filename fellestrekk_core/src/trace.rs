// Copyright 2026 the Fellestrekk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the table session.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! [`Table`](crate::table::Table) calls as it handles messages, queues
//! animations and runs logic steps. All method bodies default to no-ops, so
//! implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).

use crate::animation::AnimationKind;
use crate::protocol::{ClientCommand, MessageKind, ProtocolError};
use crate::timing::StepReport;

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a server message was parsed and is about to be applied.
#[derive(Clone, Copy, Debug)]
pub struct MessageEvent<'a> {
    /// The raw frame.
    pub text: &'a str,
    /// What it parsed as.
    pub kind: MessageKind,
}

/// Why a server message had no effect.
#[derive(Clone, Copy, Debug)]
pub enum IgnoreReason<'a> {
    /// The frame did not parse.
    Malformed(&'a ProtocolError),
    /// `REVEALDOWNS` arrived while the dealer holds no card.
    NoHoleCard,
}

/// Emitted when a server message is dropped.
#[derive(Clone, Copy, Debug)]
pub struct IgnoredMessageEvent<'a> {
    /// The raw frame.
    pub text: &'a str,
    /// Why it was dropped.
    pub reason: IgnoreReason<'a>,
}

/// Emitted for each `STATUS` code that is not a known capability.
#[derive(Clone, Copy, Debug)]
pub struct UnknownCapabilityEvent<'a> {
    /// The unrecognized code.
    pub code: &'a str,
}

/// Emitted when an entry joins the animation queue.
#[derive(Clone, Copy, Debug)]
pub struct AnimationEnqueuedEvent {
    /// What was queued.
    pub kind: AnimationKind,
    /// Queue length after the push.
    pub queue_len: usize,
}

/// Emitted when an entry leaves the animation queue.
#[derive(Clone, Copy, Debug)]
pub struct AnimationFinishedEvent {
    /// What finished.
    pub kind: AnimationKind,
    /// Whether it was fast-forwarded by force-finish.
    pub forced: bool,
    /// Queue length after the pop.
    pub queue_len: usize,
}

/// Emitted once per render callback after the frame clock ran.
#[derive(Clone, Copy, Debug)]
pub struct StepsEvent {
    /// Render delta fed to the clock, in seconds.
    pub frame_delta: f64,
    /// What the clock did.
    pub report: StepReport,
    /// Queue length after the steps.
    pub queue_len: usize,
}

/// Emitted for each command the session asks to send.
#[derive(Clone, Copy, Debug)]
pub struct CommandEvent<'a> {
    /// The outgoing command.
    pub command: &'a ClientCommand,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the table session.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a server message is parsed.
    fn on_message(&mut self, e: &MessageEvent<'_>) {
        _ = e;
    }

    /// Called when a server message is dropped.
    fn on_message_ignored(&mut self, e: &IgnoredMessageEvent<'_>) {
        _ = e;
    }

    /// Called for each unknown `STATUS` code.
    fn on_unknown_capability(&mut self, e: &UnknownCapabilityEvent<'_>) {
        _ = e;
    }

    /// Called when an animation is queued.
    fn on_animation_enqueued(&mut self, e: &AnimationEnqueuedEvent) {
        _ = e;
    }

    /// Called when an animation leaves the queue.
    fn on_animation_finished(&mut self, e: &AnimationFinishedEvent) {
        _ = e;
    }

    /// Called after each render callback's logic steps.
    fn on_steps(&mut self, e: &StepsEvent) {
        _ = e;
    }

    /// Called for each outgoing command.
    fn on_command(&mut self, e: &CommandEvent<'_>) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

/// Dispatches to the sink when tracing is compiled in.
macro_rules! dispatch {
    ($self:ident, $method:ident, $e:ident) => {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut $self.sink {
            s.$method($e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = $e;
        }
    };
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`MessageEvent`].
    #[inline]
    pub fn message(&mut self, e: &MessageEvent<'_>) {
        dispatch!(self, on_message, e);
    }

    /// Emits an [`IgnoredMessageEvent`].
    #[inline]
    pub fn message_ignored(&mut self, e: &IgnoredMessageEvent<'_>) {
        dispatch!(self, on_message_ignored, e);
    }

    /// Emits an [`UnknownCapabilityEvent`].
    #[inline]
    pub fn unknown_capability(&mut self, e: &UnknownCapabilityEvent<'_>) {
        dispatch!(self, on_unknown_capability, e);
    }

    /// Emits an [`AnimationEnqueuedEvent`].
    #[inline]
    pub fn animation_enqueued(&mut self, e: &AnimationEnqueuedEvent) {
        dispatch!(self, on_animation_enqueued, e);
    }

    /// Emits an [`AnimationFinishedEvent`].
    #[inline]
    pub fn animation_finished(&mut self, e: &AnimationFinishedEvent) {
        dispatch!(self, on_animation_finished, e);
    }

    /// Emits a [`StepsEvent`].
    #[inline]
    pub fn steps(&mut self, e: &StepsEvent) {
        dispatch!(self, on_steps, e);
    }

    /// Emits a [`CommandEvent`].
    #[inline]
    pub fn command(&mut self, e: &CommandEvent<'_>) {
        dispatch!(self, on_command, e);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_message(&MessageEvent {
            text: "PING",
            kind: MessageKind::Ping,
        });
        sink.on_steps(&StepsEvent {
            frame_delta: 1.0 / 60.0,
            report: StepReport::default(),
            queue_len: 0,
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.unknown_capability(&UnknownCapabilityEvent { code: "X" });
        tracer.command(&CommandEvent {
            command: &ClientCommand::Pong,
        });
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::string::{String, ToString};
        use alloc::vec::Vec;

        struct RecordingSink {
            codes: Vec<String>,
        }
        impl TraceSink for RecordingSink {
            fn on_unknown_capability(&mut self, e: &UnknownCapabilityEvent<'_>) {
                self.codes.push(e.code.to_string());
            }
        }

        let mut sink = RecordingSink { codes: Vec::new() };
        let mut tracer = Tracer::new(&mut sink);
        tracer.unknown_capability(&UnknownCapabilityEvent { code: "Q" });
        // Access sink after tracer is dropped.
        drop(tracer);
        assert_eq!(sink.codes, ["Q"]);
    }
}
