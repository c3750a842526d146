// Copyright 2026 the Fellestrekk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web backend for the fellestrekk table.
//!
//! This crate provides integration with browser APIs:
//!
//! - [`RafLoop`]: `requestAnimationFrame` tick source
//! - [`DomPresenter`]: one `<div>` per card sprite, plus the HUD texts and the
//!   chat panel
//! - [`Connection`]: the game server WebSocket
//! - [`ConsoleSink`]: a [`TraceSink`](fellestrekk_core::trace::TraceSink)
//!   that logs to the browser console
//! - [`load_strings`]: localized labels fetched as JSON

#![no_std]

extern crate alloc;

mod console;
mod presenter;
mod raf;
mod socket;
mod strings;

pub use console::ConsoleSink;
pub use fellestrekk_core::backend::Presenter;
pub use presenter::{DomPresenter, HudLayout};
pub use raf::RafLoop;
pub use socket::{Connection, ConnectionError, ConnectionState, socket_url};
pub use strings::{load_strings, parse_strings};

use fellestrekk_core::time::{HostTime, Timebase};

/// Returns the current host time from `performance.now()`.
///
/// The returned [`HostTime`] is in microsecond ticks. Use [`timebase`] to
/// convert to seconds.
#[must_use]
pub fn now() -> HostTime {
    raf::host_time(raf::performance_now())
}

/// Returns the web [`Timebase`]: 1 tick = 1 µs = 1000 ns.
#[must_use]
pub const fn timebase() -> Timebase {
    Timebase::MICROS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timebase_is_microsecond() {
        let tb = timebase();
        assert_eq!(tb.ticks_to_nanos(1), 1000);
        assert_eq!(tb.ticks_to_nanos(1_000_000), 1_000_000_000);
    }

    #[test]
    fn raf_timestamps_become_microseconds() {
        assert_eq!(raf::host_time(16.667), HostTime(16_667));
        assert_eq!(raf::host_time(-1.0), HostTime(0), "clamped");
    }
}
