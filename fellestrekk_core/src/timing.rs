// Copyright 2026 the Fellestrekk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame ticks and the fixed-step frame clock.
//!
//! Backends deliver a [`FrameTick`] per display frame. Render callbacks are
//! irregular (tab throttling, GC pauses, 120 Hz panels), but the animation
//! queue wants a deterministic sequence of equal logic steps. The pipeline is:
//!
//! 1. [`DeltaTracker`] turns successive ticks into a render delta in seconds.
//! 2. [`FixedStep::update`] accumulates that delta and runs the logic
//!    callback once per whole step, at most
//!    [`max_steps_per_update`](FixedStepConfig::max_steps_per_update) times.
//! 3. Whole steps beyond the cap are dropped; only the sub-step remainder is
//!    carried into the next callback. A stall therefore costs a visual jump
//!    rather than a burst of catch-up work.

use crate::time::{HostTime, Timebase};

/// A frame opportunity delivered by a backend tick source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameTick {
    /// Host time when the tick was generated.
    pub now: HostTime,
    /// Monotonically increasing frame counter.
    pub frame_index: u64,
}

/// Converts successive [`FrameTick`]s into render deltas in seconds.
#[derive(Clone, Copy, Debug)]
pub struct DeltaTracker {
    timebase: Timebase,
    last: Option<HostTime>,
}

impl DeltaTracker {
    /// Creates a tracker for ticks expressed in `timebase`.
    #[must_use]
    pub const fn new(timebase: Timebase) -> Self {
        Self {
            timebase,
            last: None,
        }
    }

    /// Returns the seconds since the previous tick. The first tick yields
    /// zero.
    pub fn delta(&mut self, tick: &FrameTick) -> f64 {
        let delta = match self.last {
            Some(last) => tick.now.secs_since(last, self.timebase),
            None => 0.0,
        };
        self.last = Some(tick.now);
        delta
    }
}

/// Fraction of a step treated as floating-point noise when counting whole
/// steps.
const STEP_TOLERANCE: f64 = 1e-9;

/// Configuration for [`FixedStep`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedStepConfig {
    /// Length of one logic step, in seconds.
    pub step: f64,
    /// Maximum logic steps run by a single [`FixedStep::update`] call.
    pub max_steps_per_update: u32,
}

impl FixedStepConfig {
    /// 60 logic steps per second, at most 5 per render callback.
    pub const DEFAULT: Self = Self {
        step: 1.0 / 60.0,
        max_steps_per_update: 5,
    };
}

impl Default for FixedStepConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// What a single [`FixedStep::update`] call did.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StepReport {
    /// Number of logic steps run.
    pub steps: u32,
    /// Accumulated time discarded because the step cap was reached, in
    /// seconds.
    pub dropped_secs: f64,
}

/// Fixed-step ticker.
///
/// The only state is the time accumulator; it lives as long as the display
/// session.
#[derive(Clone, Copy, Debug)]
pub struct FixedStep {
    config: FixedStepConfig,
    accumulator: f64,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(FixedStepConfig::DEFAULT)
    }
}

impl FixedStep {
    /// Creates a clock with an empty accumulator.
    #[must_use]
    pub const fn new(config: FixedStepConfig) -> Self {
        Self {
            config,
            accumulator: 0.0,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> FixedStepConfig {
        self.config
    }

    /// Returns the time carried over to the next update, in seconds.
    #[must_use]
    pub const fn pending(&self) -> f64 {
        self.accumulator
    }

    /// Adds `delta` seconds and calls `logic` once per whole step, passing the
    /// step length.
    ///
    /// Negative and non-finite deltas are ignored.
    pub fn update(&mut self, delta: f64, mut logic: impl FnMut(f64)) -> StepReport {
        let mut report = StepReport::default();
        if !delta.is_finite() || delta < 0.0 {
            return report;
        }

        let step = self.config.step;
        // Accumulated rounding error must not turn a whole step into a remainder.
        let tolerance = step * STEP_TOLERANCE;
        self.accumulator += delta;

        while self.accumulator + tolerance >= step
            && report.steps < self.config.max_steps_per_update
        {
            self.accumulator = (self.accumulator - step).max(0.0);
            logic(step);
            report.steps += 1;
        }

        if self.accumulator + tolerance >= step {
            let mut remainder = self.accumulator % step;
            if step - remainder <= tolerance {
                remainder = 0.0;
            }
            report.dropped_secs = self.accumulator - remainder;
            self.accumulator = remainder;
        }

        report
    }

    /// Discards any accumulated time.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
