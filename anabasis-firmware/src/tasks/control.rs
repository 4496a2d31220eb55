//! Cabin control task
//!
//! Owns the motor, the sensor bank and the scheduler exclusively; every
//! other task sees only the shared [`CabinState`](crate::channels::CabinState).
//! The settle dwell and the idle backoff block this task alone - status and
//! link traffic keep flowing through them.

use defmt::*;
use embassy_time::Timer;

use anabasis_core::scheduler::{Direction, Scheduler, TickCommand};
use anabasis_core::stepper::{Sequencer, StepDirection};
use anabasis_core::traits::FloorSensorBank;
use anabasis_hal_rp2040::clock::RpClock;
use anabasis_hal_rp2040::gpio::{CoilPin, SensePin};
use anabasis_protocol::CabinReport;

use crate::channels::{CABIN, OUTBOUND};
use crate::config::SHAFT;

/// Control task - runs the SCAN scheduler and drives the motor
#[embassy_executor::task]
pub async fn control_task(
    mut motor: Sequencer<CoilPin, RpClock>,
    sensors: FloorSensorBank<SensePin>,
    mut scheduler: Scheduler,
) {
    info!("Control task started");

    loop {
        // One scheduler pass under the cabin lock: request reads, the
        // arrival clear, and the position update are a single critical
        // section against the link and status tasks.
        let command = {
            let mut cabin = CABIN.lock().await;
            let command = scheduler.tick(&mut cabin.requests, &sensors);
            cabin.current_floor = scheduler.current_floor();
            command
        };

        match command {
            TickCommand::Idle => {
                Timer::after_millis(SHAFT.timings.idle_poll_ms as u64).await;
            }
            TickCommand::Drive { direction } => {
                drive_burst(&mut motor, direction, SHAFT.motor.burst_steps).await;
                Timer::after_millis(SHAFT.timings.tick_yield_ms as u64).await;
            }
            TickCommand::Arrived { floor } => {
                info!("Arrived at floor {}", floor);
                motor.stop();
                // Door-dwell emulation before the next destination
                Timer::after_millis(SHAFT.timings.settle_ms as u64).await;
                scheduler.settle_complete();
            }
            TickCommand::Stalled {
                destination,
                windows,
            } => {
                warn!(
                    "No progress toward floor {} after {} stall windows, giving up",
                    destination, windows
                );
                motor.stop();
                let _ = OUTBOUND.try_send(CabinReport::Fault { destination });
            }
        }
    }
}

/// Drive one step burst cooperatively
///
/// Same timing gate as the blocking `Sequencer::step`, but between phase
/// transitions this sleeps on the timer instead of spinning, so a burst
/// never monopolizes the executor.
async fn drive_burst(motor: &mut Sequencer<CoilPin, RpClock>, direction: Direction, burst: u32) {
    let step_direction = match direction {
        Direction::Up => StepDirection::Forward,
        Direction::Down => StepDirection::Reverse,
    };

    let mut remaining = burst;
    while remaining > 0 {
        if motor.try_advance(step_direction) {
            remaining -= 1;
        } else {
            Timer::after_micros(motor.micros_until_ready().max(1)).await;
        }
    }
}
