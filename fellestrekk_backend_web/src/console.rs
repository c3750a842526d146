// Copyright 2026 the Fellestrekk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser console trace output.

use alloc::format;
use alloc::string::String;

use fellestrekk_core::trace::{
    AnimationEnqueuedEvent, AnimationFinishedEvent, CommandEvent, IgnoreReason,
    IgnoredMessageEvent, MessageEvent, StepsEvent, TraceSink, UnknownCapabilityEvent,
};
use wasm_bindgen::JsValue;
use web_sys::console;

/// Logs table events to the browser console.
///
/// Dropped messages and unknown capability codes are always reported with
/// `console.warn`. With `verbose`, traffic and queue activity are logged with
/// `console.debug` as well.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleSink {
    /// Also log every message, command and animation.
    pub verbose: bool,
}

impl ConsoleSink {
    /// A sink that only reports problems.
    #[must_use]
    pub const fn quiet() -> Self {
        Self { verbose: false }
    }

    /// A sink that logs everything.
    #[must_use]
    pub const fn verbose() -> Self {
        Self { verbose: true }
    }

    fn debug(&self, line: &str) {
        if self.verbose {
            console::debug_1(&JsValue::from_str(line));
        }
    }
}

fn warn(line: &str) {
    console::warn_1(&JsValue::from_str(line));
}

fn ignored_line(e: &IgnoredMessageEvent<'_>) -> String {
    match e.reason {
        IgnoreReason::Malformed(error) => format!("ignored {:?}: {error}", e.text),
        IgnoreReason::NoHoleCard => format!("ignored {:?}: dealer has no hole card", e.text),
    }
}

impl TraceSink for ConsoleSink {
    fn on_message(&mut self, e: &MessageEvent<'_>) {
        self.debug(&format!("recv {}: {:?}", e.kind, e.text));
    }

    fn on_message_ignored(&mut self, e: &IgnoredMessageEvent<'_>) {
        warn(&ignored_line(e));
    }

    fn on_unknown_capability(&mut self, e: &UnknownCapabilityEvent<'_>) {
        warn(&format!("unknown STATUS code {:?}", e.code));
    }

    fn on_animation_enqueued(&mut self, e: &AnimationEnqueuedEvent) {
        self.debug(&format!("queue +{:?} (len {})", e.kind, e.queue_len));
    }

    fn on_animation_finished(&mut self, e: &AnimationFinishedEvent) {
        let how = if e.forced { "forced" } else { "done" };
        self.debug(&format!("queue -{:?} {how} (len {})", e.kind, e.queue_len));
    }

    fn on_steps(&mut self, e: &StepsEvent) {
        if e.report.dropped_secs > 0.0 {
            warn(&format!(
                "frame clock dropped {:.3}s after a {:.3}s frame",
                e.report.dropped_secs, e.frame_delta
            ));
        }
    }

    fn on_command(&mut self, e: &CommandEvent<'_>) {
        self.debug(&format!("send {}", e.command));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fellestrekk_core::protocol::ServerMessage;

    #[test]
    fn ignored_lines_name_the_frame_and_the_reason() {
        let Err(error) = ServerMessage::parse("DECKSIZE many") else {
            panic!("DECKSIZE needs a number");
        };
        let line = ignored_line(&IgnoredMessageEvent {
            text: "DECKSIZE many",
            reason: IgnoreReason::Malformed(&error),
        });
        assert!(line.starts_with("ignored \"DECKSIZE many\": "), "got {line}");

        let line = ignored_line(&IgnoredMessageEvent {
            text: "REVEALDOWNS ♣A",
            reason: IgnoreReason::NoHoleCard,
        });
        assert!(line.ends_with("no hole card"), "got {line}");
    }
}
