//! Status notifier task
//!
//! Periodically snapshots the cabin position and the encoded request table
//! and queues a status report for the panel link.

use defmt::*;
use embassy_time::{Duration, Ticker};

use anabasis_protocol::CabinReport;

use crate::channels::{CABIN, OUTBOUND};
use crate::config::SHAFT;

/// Status task - emits a position/request snapshot on a fixed period
#[embassy_executor::task]
pub async fn status_task() {
    info!("Status task started");

    let mut ticker = Ticker::every(Duration::from_millis(
        SHAFT.timings.status_period_ms as u64,
    ));

    loop {
        ticker.next().await;

        let (floor, requested) = {
            let cabin = CABIN.lock().await;
            (cabin.current_floor, cabin.requests.encode())
        };

        // Drop on overflow: the next snapshot supersedes this one anyway
        if OUTBOUND
            .try_send(CabinReport::Status { floor, requested })
            .is_err()
        {
            trace!("Outbound channel full, status snapshot dropped");
        }
    }
}
