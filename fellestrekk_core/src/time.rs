// Copyright 2026 the Fellestrekk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Monotonic host time and conversion to seconds.
//!
//! [`HostTime`] is a point in time as backend-native monotonic ticks (the web
//! backend uses microseconds derived from `performance.now()`). [`Timebase`]
//! carries the rational ticks → nanoseconds factor so the engine can turn tick
//! differences into the `f64` seconds the animation code works in.

use core::fmt;
use core::ops::Sub;

/// A point in time expressed as backend-native monotonic ticks.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct HostTime(pub u64);

impl HostTime {
    /// Returns the raw tick value.
    #[inline]
    #[must_use]
    pub const fn ticks(self) -> u64 {
        self.0
    }

    /// Returns the number of ticks elapsed since `earlier`, or zero if
    /// `earlier` is after `self`.
    #[inline]
    #[must_use]
    pub const fn saturating_ticks_since(self, earlier: Self) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    /// Returns the seconds elapsed since `earlier` (zero if `earlier` is
    /// later).
    #[inline]
    #[must_use]
    pub fn secs_since(self, earlier: Self, timebase: Timebase) -> f64 {
        timebase.ticks_to_secs(self.saturating_ticks_since(earlier))
    }
}

impl Sub for HostTime {
    type Output = u64;

    #[inline]
    fn sub(self, rhs: Self) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Debug for HostTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostTime({})", self.0)
    }
}

/// Rational conversion factor from ticks to nanoseconds.
///
/// `nanoseconds = ticks * numer / denom`
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timebase {
    /// Numerator of the ticks-to-nanoseconds ratio.
    pub numer: u32,
    /// Denominator of the ticks-to-nanoseconds ratio.
    pub denom: u32,
}

impl Timebase {
    /// A timebase where ticks are already nanoseconds (1:1).
    pub const NANOS: Self = Self { numer: 1, denom: 1 };

    /// A timebase where one tick is one microsecond.
    pub const MICROS: Self = Self {
        numer: 1000,
        denom: 1,
    };

    /// Creates a new timebase with the given numerator and denominator.
    ///
    /// # Panics
    ///
    /// Panics if `denom` is zero.
    #[inline]
    #[must_use]
    pub const fn new(numer: u32, denom: u32) -> Self {
        assert!(denom != 0, "timebase denominator must not be zero");
        Self { numer, denom }
    }

    /// Converts a tick count to nanoseconds.
    #[inline]
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "u128 intermediate avoids overflow; truncation back to u64 is intentional"
    )]
    pub const fn ticks_to_nanos(self, ticks: u64) -> u64 {
        let wide = ticks as u128 * self.numer as u128 / self.denom as u128;
        wide as u64
    }

    /// Converts a tick count to fractional seconds.
    #[inline]
    #[must_use]
    pub fn ticks_to_secs(self, ticks: u64) -> f64 {
        self.ticks_to_nanos(ticks) as f64 / 1_000_000_000.0
    }
}

impl fmt::Debug for Timebase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timebase({}/{})", self.numer, self.denom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn micros_timebase_converts_to_seconds() {
        let tb = Timebase::MICROS;
        assert_eq!(tb.ticks_to_nanos(1), 1000, "1 µs tick");
        let secs = tb.ticks_to_secs(16_667);
        assert!((secs - 0.016_667).abs() < 1e-9, "got {secs}");
    }

    #[test]
    fn secs_since_saturates_backwards() {
        let tb = Timebase::NANOS;
        let a = HostTime(2_000_000_000);
        let b = HostTime(500_000_000);
        assert!((a.secs_since(b, tb) - 1.5).abs() < 1e-12, "forward delta");
        assert_eq!(b.secs_since(a, tb), 0.0, "backwards delta is zero");
    }

    #[test]
    fn overflow_safe_conversion() {
        let tb = Timebase::new(125, 3);
        let _nanos = tb.ticks_to_nanos(u64::MAX / 2);
    }
}
