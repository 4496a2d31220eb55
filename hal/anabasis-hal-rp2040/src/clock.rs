//! Monotonic clock over the embassy-time timebase

use anabasis_hal::clock::MonotonicClock;
use embassy_time::Instant;

/// Microsecond clock backed by the RP2040 timer peripheral via embassy-time
#[derive(Debug, Clone, Copy, Default)]
pub struct RpClock;

impl MonotonicClock for RpClock {
    fn now_micros(&self) -> u64 {
        Instant::now().as_micros()
    }
}
