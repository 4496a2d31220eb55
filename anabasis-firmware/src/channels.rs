//! Inter-task communication
//!
//! Static channels and the single shared-state mutex, built on embassy-sync
//! primitives. `CABIN` is the only cross-task mutable state in the firmware:
//! the link task sets request slots, the control task clears them and moves
//! the floor, the status task snapshots both. Everything else flows through
//! the outbound report channel.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::mutex::Mutex;

use anabasis_core::requests::FloorRequestSet;
use anabasis_protocol::CabinReport;

use crate::config::SHAFT;

/// Capacity for outbound link reports
const OUTBOUND_CHANNEL_SIZE: usize = 4;

/// Floor requests plus the last confirmed cabin position
pub struct CabinState {
    /// Outstanding floor requests
    pub requests: FloorRequestSet,
    /// Last floor at which arrival was confirmed
    pub current_floor: u8,
}

/// The one synchronization boundary for cross-task cabin state
pub static CABIN: Mutex<CriticalSectionRawMutex, CabinState> = Mutex::new(CabinState {
    requests: FloorRequestSet::from_mask(SHAFT.plan.floor_count, SHAFT.initial_requests),
    current_floor: SHAFT.initial_floor,
});

/// Reports queued for the panel link
///
/// Senders use `try_send` and drop on overflow: a stale status snapshot is
/// worthless by the time the link drains, and the next one is 300 ms away.
pub static OUTBOUND: Channel<CriticalSectionRawMutex, CabinReport, OUTBOUND_CHANNEL_SIZE> =
    Channel::new();
