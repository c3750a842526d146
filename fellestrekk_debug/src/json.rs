// Copyright 2026 the Fellestrekk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON export of recorded events.

use std::io::{self, Write};

use serde_json::Value;

use crate::recorder::RecordedEvent;

/// Writes `events` as one pretty-printed JSON array of objects, each tagged
/// with an `"event"` field.
///
/// # Errors
///
/// Returns any error from `writer`.
pub fn export(events: &[RecordedEvent], writer: &mut dyn Write) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, events).map_err(io::Error::other)?;
    writeln!(writer)
}

/// Converts `events` to a JSON array value.
#[must_use]
pub fn to_value(events: &[RecordedEvent]) -> Value {
    Value::Array(
        events
            .iter()
            .filter_map(|event| serde_json::to_value(event).ok())
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_produces_tagged_array() {
        let events = [
            RecordedEvent::Message {
                text: "PING".into(),
                kind: "PING".into(),
            },
            RecordedEvent::Command {
                wire: "PONG".into(),
            },
        ];
        let mut out = Vec::new();
        export(&events, &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0]["event"], "message");
        assert_eq!(parsed[1]["event"], "command");
        assert_eq!(parsed[1]["wire"], "PONG");
        assert_eq!(to_value(&events), Value::Array(parsed));
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        assert!(parsed.is_empty());
    }
}
