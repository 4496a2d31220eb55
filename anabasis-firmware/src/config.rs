//! Deployment configuration
//!
//! One four-floor bench shaft. All state is volatile: these values are the
//! whole truth at every power-on, and `SHAFT.validate()` in `main` is the
//! gate that keeps a bad edit here from ever moving the cabin.

use anabasis_core::config::{CabinConfig, MotorConfig, PinConfig, Timings};
use anabasis_core::scheduler::{FloorPlan, StallPolicy};

/// The bench shaft
///
/// Pin numbers document the wiring; `main` maps them to embassy pin types
/// by position. Floors 0..=3 each carry an active-low IR barrier; no
/// dead-reckoning floor on this shaft.
pub const SHAFT: CabinConfig = CabinConfig {
    motor: MotorConfig {
        coil_pins: [
            PinConfig::new(10),
            PinConfig::new(11),
            PinConfig::new(12),
            PinConfig::new(13),
        ],
        // Geared 28BYJ-class motor, half-step
        steps_per_rev: 4095,
        rpm: 10,
        burst_steps: 10,
    },
    plan: FloorPlan {
        floor_count: 4,
        descent_sensor_offset: 0,
        dead_reckoning: None,
    },
    sensor_pins: [
        Some(PinConfig::sensor(16)),
        Some(PinConfig::sensor(17)),
        Some(PinConfig::sensor(18)),
        Some(PinConfig::sensor(19)),
        None,
        None,
        None,
        None,
    ],
    stall: StallPolicy {
        // At 10 ms per tick a window is ~30 s of travel with no sensor
        // progress, far beyond one floor at 10 RPM
        ticks_per_window: 3000,
        max_windows: 3,
    },
    timings: Timings {
        settle_ms: 2500,
        idle_poll_ms: 1000,
        tick_yield_ms: 10,
        status_period_ms: 300,
    },
    initial_floor: 0,
    // Self-test ride: one request preloaded so a fresh flash exercises the
    // full seek-arrive-settle path without a panel attached
    initial_requests: 0b0000_1000,
};
