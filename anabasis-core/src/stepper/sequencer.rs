//! Timing-gated phase sequencer
//!
//! Converts a requested step count into timed coil transitions. A transition
//! is only issued once the configured inter-step interval has elapsed on the
//! monotonic clock; the interval is derived from the commanded speed.

use anabasis_hal::clock::MonotonicClock;
use anabasis_hal::gpio::OutputPin;

use super::{pattern_for, StepDirection, PHASE_COUNT, RELEASED};

/// Speed ceiling in RPM
///
/// Above this the geared cabin motor cannot follow the coil switching and
/// starts missing steps, so higher requests are clamped rather than honored.
pub const MAX_RPM: u32 = 16;

/// Four-phase half-step sequencer bound to one motor
///
/// Owns the four coil lines for its lifetime. Not reentrant: exactly one
/// task may drive it, and a burst must finish before the next begins, or the
/// phase index and the coil pattern race.
pub struct Sequencer<P, C> {
    coils: [P; 4],
    clock: C,
    steps_per_rev: u32,
    step_interval_us: u64,
    last_step_us: u64,
    phase: u8,
}

impl<P: OutputPin, C: MonotonicClock> Sequencer<P, C> {
    /// Bind four coil lines and a clock; leaves the motor released
    ///
    /// Starts at the slowest speed (1 RPM) until [`set_speed`] is called,
    /// so an unconfigured sequencer can never outrun the motor.
    ///
    /// [`set_speed`]: Self::set_speed
    pub fn new(steps_per_rev: u32, coils: [P; 4], clock: C) -> Self {
        let mut sequencer = Self {
            coils,
            clock,
            steps_per_rev,
            step_interval_us: 0,
            last_step_us: 0,
            phase: 0,
        };
        sequencer.set_speed(1);
        sequencer.apply(RELEASED);
        sequencer
    }

    /// Set the speed in revolutions per minute
    ///
    /// Clamped to `1..=MAX_RPM`. The interval between phase transitions
    /// becomes `60_000_000 / steps_per_rev / rpm` microseconds.
    pub fn set_speed(&mut self, rpm: u32) {
        let rpm = rpm.clamp(1, MAX_RPM) as u64;
        self.step_interval_us = 60_000_000 / self.steps_per_rev as u64 / rpm;
    }

    /// Current inter-step interval in microseconds
    pub fn step_interval_us(&self) -> u64 {
        self.step_interval_us
    }

    /// Current phase index, always in `0..8`
    pub fn phase(&self) -> u8 {
        self.phase
    }

    /// Levels currently driven on the four coil lines
    pub fn coil_levels(&self) -> [bool; 4] {
        [
            self.coils[0].is_set_high(),
            self.coils[1].is_set_high(),
            self.coils[2].is_set_high(),
            self.coils[3].is_set_high(),
        ]
    }

    /// Advance `count.abs()` phases, blocking until all are issued
    ///
    /// The sign of `count` selects the direction: positive increments the
    /// phase index, negative decrements it. Busy-waits on the monotonic
    /// clock between transitions; the calling task owns the CPU and the
    /// motor for the whole burst. Cooperative callers use [`try_advance`]
    /// and sleep for [`micros_until_ready`] instead.
    ///
    /// [`try_advance`]: Self::try_advance
    /// [`micros_until_ready`]: Self::micros_until_ready
    pub fn step(&mut self, count: i32) {
        let direction = if count < 0 {
            StepDirection::Reverse
        } else {
            StepDirection::Forward
        };
        let mut remaining = count.unsigned_abs();
        while remaining > 0 {
            if self.try_advance(direction) {
                remaining -= 1;
            }
        }
    }

    /// Issue one phase transition if the step interval has elapsed
    ///
    /// Returns whether a transition was issued. This is the non-blocking
    /// half of [`step`](Self::step); polling it and sleeping between polls
    /// yields the same cadence without monopolizing the executor.
    pub fn try_advance(&mut self, direction: StepDirection) -> bool {
        let now = self.clock.now_micros();
        if now.wrapping_sub(self.last_step_us) < self.step_interval_us {
            return false;
        }
        self.last_step_us = now;
        self.phase = match direction {
            StepDirection::Forward => (self.phase + 1) % PHASE_COUNT,
            StepDirection::Reverse => match self.phase.checked_sub(1) {
                Some(phase) => phase,
                None => PHASE_COUNT - 1,
            },
        };
        self.apply(pattern_for(self.phase));
        true
    }

    /// Microseconds until the next transition may be issued (0 = ready now)
    pub fn micros_until_ready(&self) -> u64 {
        let elapsed = self.clock.now_micros().wrapping_sub(self.last_step_us);
        self.step_interval_us.saturating_sub(elapsed)
    }

    /// De-energize all coils immediately, bypassing step timing
    ///
    /// The halt operation: the motor free-wheels and holds no torque. The
    /// phase index is kept, so the next step resumes the sequence where it
    /// left off.
    pub fn stop(&mut self) {
        self.apply(RELEASED);
    }

    fn apply(&mut self, pattern: [bool; 4]) {
        for (coil, level) in self.coils.iter_mut().zip(pattern) {
            coil.set_level(level);
        }
    }
}
