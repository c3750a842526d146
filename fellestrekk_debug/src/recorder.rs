// Copyright 2026 the Fellestrekk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory event recording.
//!
//! [`RecorderSink`] implements [`TraceSink`] and keeps an owned copy of every
//! event as a [`RecordedEvent`], in arrival order. Borrowed payloads (frame
//! text, errors, commands) are stored as strings.

use fellestrekk_core::trace::{
    AnimationEnqueuedEvent, AnimationFinishedEvent, CommandEvent, IgnoreReason,
    IgnoredMessageEvent, MessageEvent, StepsEvent, TraceSink, UnknownCapabilityEvent,
};
use serde::Serialize;

/// An owned trace event.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RecordedEvent {
    /// A server frame was parsed.
    Message {
        /// The raw frame.
        text: String,
        /// Its message kind (`"DECKSIZE"`).
        kind: String,
    },
    /// A server frame was dropped.
    MessageIgnored {
        /// The raw frame.
        text: String,
        /// Why.
        reason: String,
    },
    /// A `STATUS` code was not recognized.
    UnknownCapability {
        /// The code.
        code: String,
    },
    /// An entry joined the animation queue.
    AnimationEnqueued {
        /// Entry kind (`"Motion"`).
        kind: String,
        /// Queue length after the push.
        queue_len: usize,
    },
    /// An entry left the animation queue.
    AnimationFinished {
        /// Entry kind.
        kind: String,
        /// Whether force-finish cut it short.
        forced: bool,
        /// Queue length after the pop.
        queue_len: usize,
    },
    /// A render callback ran the frame clock.
    Steps {
        /// Render delta, in seconds.
        frame_delta: f64,
        /// Logic steps run.
        steps: u32,
        /// Time dropped by the step cap, in seconds.
        dropped_secs: f64,
        /// Queue length afterwards.
        queue_len: usize,
    },
    /// A command was sent.
    Command {
        /// Its wire form.
        wire: String,
    },
}

/// A [`TraceSink`] that keeps every event in memory.
#[derive(Clone, Debug, Default)]
pub struct RecorderSink {
    events: Vec<RecordedEvent>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded events.
    #[must_use]
    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    /// Consumes the recorder and returns the recorded events.
    #[must_use]
    pub fn into_events(self) -> Vec<RecordedEvent> {
        self.events
    }

    /// Discards everything recorded so far.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Wire forms of the recorded commands, in order.
    pub fn commands(&self) -> impl Iterator<Item = &str> + '_ {
        self.events.iter().filter_map(|event| match event {
            RecordedEvent::Command { wire } => Some(wire.as_str()),
            _ => None,
        })
    }
}

impl TraceSink for RecorderSink {
    fn on_message(&mut self, e: &MessageEvent<'_>) {
        self.events.push(RecordedEvent::Message {
            text: e.text.to_owned(),
            kind: e.kind.to_string(),
        });
    }

    fn on_message_ignored(&mut self, e: &IgnoredMessageEvent<'_>) {
        let reason = match e.reason {
            IgnoreReason::Malformed(error) => error.to_string(),
            IgnoreReason::NoHoleCard => "no hole card".to_owned(),
        };
        self.events.push(RecordedEvent::MessageIgnored {
            text: e.text.to_owned(),
            reason,
        });
    }

    fn on_unknown_capability(&mut self, e: &UnknownCapabilityEvent<'_>) {
        self.events.push(RecordedEvent::UnknownCapability {
            code: e.code.to_owned(),
        });
    }

    fn on_animation_enqueued(&mut self, e: &AnimationEnqueuedEvent) {
        self.events.push(RecordedEvent::AnimationEnqueued {
            kind: format!("{:?}", e.kind),
            queue_len: e.queue_len,
        });
    }

    fn on_animation_finished(&mut self, e: &AnimationFinishedEvent) {
        self.events.push(RecordedEvent::AnimationFinished {
            kind: format!("{:?}", e.kind),
            forced: e.forced,
            queue_len: e.queue_len,
        });
    }

    fn on_steps(&mut self, e: &StepsEvent) {
        self.events.push(RecordedEvent::Steps {
            frame_delta: e.frame_delta,
            steps: e.report.steps,
            dropped_secs: e.report.dropped_secs,
            queue_len: e.queue_len,
        });
    }

    fn on_command(&mut self, e: &CommandEvent<'_>) {
        self.events.push(RecordedEvent::Command {
            wire: e.command.to_string(),
        });
    }
}
