// Copyright 2026 the Fellestrekk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use fellestrekk_core::trace::{
    AnimationEnqueuedEvent, AnimationFinishedEvent, CommandEvent, IgnoreReason,
    IgnoredMessageEvent, MessageEvent, StepsEvent, TraceSink, UnknownCapabilityEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write)
/// destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    idle_steps: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("idle_steps", &self.idle_steps)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::with_writer(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self::with_writer(writer)
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            idle_steps: false,
        }
    }

    /// Also print render callbacks that ran no logic step.
    #[must_use]
    pub fn with_idle_steps(mut self, idle_steps: bool) -> Self {
        self.idle_steps = idle_steps;
        self
    }

    /// Returns the destination.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_message(&mut self, e: &MessageEvent<'_>) {
        let _ = writeln!(self.writer, "[recv] {} {:?}", e.kind, e.text);
    }

    fn on_message_ignored(&mut self, e: &IgnoredMessageEvent<'_>) {
        let _ = match e.reason {
            IgnoreReason::Malformed(error) => {
                writeln!(self.writer, "[ignored] {:?}: {error}", e.text)
            }
            IgnoreReason::NoHoleCard => {
                writeln!(self.writer, "[ignored] {:?}: no hole card", e.text)
            }
        };
    }

    fn on_unknown_capability(&mut self, e: &UnknownCapabilityEvent<'_>) {
        let _ = writeln!(self.writer, "[status] unknown code {:?}", e.code);
    }

    fn on_animation_enqueued(&mut self, e: &AnimationEnqueuedEvent) {
        let _ = writeln!(self.writer, "[queue+] {:?} len={}", e.kind, e.queue_len);
    }

    fn on_animation_finished(&mut self, e: &AnimationFinishedEvent) {
        let how = if e.forced { "FORCED" } else { "done" };
        let _ = writeln!(
            self.writer,
            "[queue-] {:?} {how} len={}",
            e.kind, e.queue_len
        );
    }

    fn on_steps(&mut self, e: &StepsEvent) {
        if e.report.steps == 0 && !self.idle_steps {
            return;
        }
        let _ = writeln!(
            self.writer,
            "[steps] delta={:.4}s steps={} dropped={:.4}s len={}",
            e.frame_delta, e.report.steps, e.report.dropped_secs, e.queue_len,
        );
    }

    fn on_command(&mut self, e: &CommandEvent<'_>) {
        let _ = writeln!(self.writer, "[send] {}", e.command);
    }
}
