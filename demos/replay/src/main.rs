// Copyright 2026 the Fellestrekk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Replays a server transcript through a [`Table`] without a browser.
//!
//! The transcript is read from stdin, one entry per line:
//!
//! - `# ...` and blank lines are skipped.
//! - `@key <code>` presses a key (`KeyboardEvent.code`, e.g. `KeyH`, `Space`).
//! - `@wait <secs>` runs 60 Hz render callbacks for that long.
//! - Anything else is a server frame.
//!
//! Every event is printed with a
//! [`PrettyPrintSink`](fellestrekk_debug::pretty::PrettyPrintSink). If a path
//! is given as the first argument, the recorded events are also written
//! there as JSON.
//!
//! ```text
//! cargo run -p replay -- trace.json < demos/replay/deal.txt
//! ```

use std::fs::File;
use std::io::{BufRead, BufWriter};

use fellestrekk_core::config::TableConfig;
use fellestrekk_core::strings::Strings;
use fellestrekk_core::table::Table;
use fellestrekk_core::trace::{TraceSink, Tracer};

use fellestrekk_debug::json;
use fellestrekk_debug::pretty::PrettyPrintSink;
use fellestrekk_debug::recorder::RecorderSink;

const FRAME_SECS: f64 = 1.0 / 60.0;

/// One transcript line.
#[derive(Debug, PartialEq)]
enum Entry<'a> {
    Frame(&'a str),
    Key(&'a str),
    Wait(f64),
}

fn parse_line(line: &str) -> Option<Entry<'_>> {
    let line = line.trim_end();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    if let Some(code) = line.strip_prefix("@key ") {
        return Some(Entry::Key(code.trim()));
    }
    if let Some(secs) = line.strip_prefix("@wait ") {
        return secs.trim().parse().ok().map(Entry::Wait);
    }
    Some(Entry::Frame(line))
}

/// Fans every event out to two sinks.
struct Tee<'a> {
    a: &'a mut dyn TraceSink,
    b: &'a mut dyn TraceSink,
}

macro_rules! tee {
    ($($method:ident($event:ty)),* $(,)?) => {
        impl TraceSink for Tee<'_> {
            $(
                fn $method(&mut self, e: &$event) {
                    self.a.$method(e);
                    self.b.$method(e);
                }
            )*
        }
    };
}

tee!(
    on_message(fellestrekk_core::trace::MessageEvent<'_>),
    on_message_ignored(fellestrekk_core::trace::IgnoredMessageEvent<'_>),
    on_unknown_capability(fellestrekk_core::trace::UnknownCapabilityEvent<'_>),
    on_animation_enqueued(fellestrekk_core::trace::AnimationEnqueuedEvent),
    on_animation_finished(fellestrekk_core::trace::AnimationFinishedEvent),
    on_steps(fellestrekk_core::trace::StepsEvent),
    on_command(fellestrekk_core::trace::CommandEvent<'_>),
);

fn replay(table: &mut Table, entry: &Entry<'_>, tracer: &mut Tracer<'_>) {
    match *entry {
        Entry::Frame(text) => {
            table.handle_server_message_traced(text, tracer);
        }
        Entry::Key(code) => {
            table.key_down_traced(code, tracer);
        }
        Entry::Wait(secs) => {
            let mut left = secs;
            while left > 0.0 {
                table.on_render_frame_traced(FRAME_SECS.min(left), tracer);
                left -= FRAME_SECS;
            }
        }
    }
}

fn main() -> std::io::Result<()> {
    let json_path = std::env::args().nth(1);

    let mut pretty = PrettyPrintSink::new(Box::new(std::io::stdout()));
    let mut recorder = RecorderSink::new();
    let mut table = Table::new(TableConfig::web(), Strings::default());

    {
        let mut tee = Tee {
            a: &mut pretty,
            b: &mut recorder,
        };
        let mut tracer = Tracer::new(&mut tee);
        for line in std::io::stdin().lock().lines() {
            let line = line?;
            if let Some(entry) = parse_line(&line) {
                replay(&mut table, &entry, &mut tracer);
            }
        }
    }

    if let Some(path) = json_path {
        let mut out = BufWriter::new(File::create(path)?);
        json::export(recorder.events(), &mut out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcript_lines() {
        assert_eq!(parse_line("# dealer shuffles"), None);
        assert_eq!(parse_line("   "), None);
        assert_eq!(parse_line("@key Space"), Some(Entry::Key("Space")));
        assert_eq!(parse_line("@wait 0.5"), Some(Entry::Wait(0.5)));
        assert_eq!(parse_line("@wait soon"), None, "bad wait skipped");
        assert_eq!(parse_line("DECKSIZE 260"), Some(Entry::Frame("DECKSIZE 260")));
    }

    #[test]
    fn wait_runs_the_frame_clock() {
        let mut table = Table::new(TableConfig::web(), Strings::default());
        let mut recorder = RecorderSink::new();
        let mut tracer = Tracer::new(&mut recorder);
        replay(&mut table, &Entry::Frame("PLAYERDRAW 0 ♦2"), &mut tracer);
        replay(&mut table, &Entry::Wait(1.0), &mut tracer);
        drop(tracer);
        assert_eq!(table.queue_len(), 0, "one second lands the card");
    }
}
