//! Configuration type definitions

use crate::requests::MAX_FLOORS;
use crate::scheduler::{FloorPlan, StallPolicy};
use crate::stepper::MAX_RPM;

/// Pin configuration with optional inversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PinConfig {
    /// GPIO pin number
    pub pin: u8,
    /// Pin is active-low (inverted)
    pub inverted: bool,
    /// Enable the internal pull-up
    pub pull_up: bool,
}

impl PinConfig {
    /// Create a plain active-high pin config
    pub const fn new(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
            pull_up: false,
        }
    }

    /// Create an inverted (active-low) pin config
    pub const fn inverted(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
            pull_up: false,
        }
    }

    /// Create an active-low pin config with the pull-up enabled
    ///
    /// The usual shape for an IR floor sensor: the barrier pulls the line
    /// low when the cabin blocks it.
    pub const fn sensor(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
            pull_up: true,
        }
    }
}

/// Cabin motor configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotorConfig {
    /// The four coil drive lines, in phase-table order
    pub coil_pins: [PinConfig; 4],
    /// Half-steps per output-shaft revolution (gearing included)
    pub steps_per_rev: u32,
    /// Travel speed in RPM, at most [`MAX_RPM`]
    pub rpm: u32,
    /// Half-steps driven per control tick
    pub burst_steps: u32,
}

/// Control-loop and reporting cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timings {
    /// Door-dwell emulation after each arrival, in milliseconds
    pub settle_ms: u32,
    /// Poll backoff while no floor is requested
    pub idle_poll_ms: u32,
    /// Yield between drive bursts; sets the sensor poll granularity
    pub tick_yield_ms: u32,
    /// Status notification period
    pub status_period_ms: u32,
}

/// Complete configuration for one shaft
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CabinConfig {
    /// Motor wiring and drive parameters
    pub motor: MotorConfig,
    /// Shaft layout the scheduler runs against
    pub plan: FloorPlan,
    /// One sensor input per floor index; `None` = no sensor at that floor
    pub sensor_pins: [Option<PinConfig>; MAX_FLOORS],
    /// Stall give-up policy
    pub stall: StallPolicy,
    /// Dwell and poll intervals
    pub timings: Timings,
    /// Floor the position counter assumes at power-on
    pub initial_floor: u8,
    /// Request bitmap loaded at power-on (bit i = floor i)
    pub initial_requests: u8,
}

/// Configuration rejected at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Floor count outside `2..=MAX_FLOORS`
    FloorCountOutOfRange,
    /// Motor RPM of zero or above [`MAX_RPM`]
    RpmOutOfRange,
    /// Steps-per-revolution of zero
    ZeroStepsPerRev,
    /// Burst size of zero would make every tick a no-op
    ZeroBurst,
    /// Initial or dead-reckoning floor outside the served range
    FloorOutOfRange,
    /// A stall window of zero ticks trips on the first burst
    ZeroStallWindow,
    /// A dead-reckoning floor with a zero step budget arrives instantly
    ZeroDeadReckoningBudget,
}

impl CabinConfig {
    /// Check the configuration before bringing up any task
    ///
    /// All of these are programming or wiring errors, so a failure here is
    /// fatal: the firmware refuses to run rather than move the cabin on bad
    /// parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.plan.floor_count < 2 || self.plan.floor_count as usize > MAX_FLOORS {
            return Err(ConfigError::FloorCountOutOfRange);
        }
        if self.motor.rpm == 0 || self.motor.rpm > MAX_RPM {
            return Err(ConfigError::RpmOutOfRange);
        }
        if self.motor.steps_per_rev == 0 {
            return Err(ConfigError::ZeroStepsPerRev);
        }
        if self.motor.burst_steps == 0 {
            return Err(ConfigError::ZeroBurst);
        }
        if self.initial_floor >= self.plan.floor_count {
            return Err(ConfigError::FloorOutOfRange);
        }
        if self.stall.ticks_per_window == 0 || self.stall.max_windows == 0 {
            return Err(ConfigError::ZeroStallWindow);
        }
        if let Some(dead) = self.plan.dead_reckoning {
            if dead.floor >= self.plan.floor_count {
                return Err(ConfigError::FloorOutOfRange);
            }
            if dead.steps == 0 {
                return Err(ConfigError::ZeroDeadReckoningBudget);
            }
        }
        Ok(())
    }
}
