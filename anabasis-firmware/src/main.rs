//! Anabasis - Miniature Elevator Firmware
//!
//! Main firmware binary for RP2040-based cabin controllers. Drives a
//! four-phase stepper cabin motor between floors under a SCAN scheduler,
//! with floor calls and status notifications over a framed panel link.
//!
//! Named after the Greek "anabasis" meaning "a going up" - the cabin's
//! climb between floors is the whole job of this firmware.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use anabasis_core::scheduler::Scheduler;
use anabasis_core::stepper::Sequencer;
use anabasis_core::traits::FloorSensorBank;
use anabasis_hal_rp2040::clock::RpClock;
use anabasis_hal_rp2040::gpio::{CoilPin, SensePin};

use crate::config::SHAFT;

mod channels;
mod config;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Anabasis firmware starting...");

    // A bad configuration is fatal before anything moves
    if let Err(e) = SHAFT.validate() {
        error!("Shaft configuration rejected: {:?}", e);
        panic!("invalid shaft configuration");
    }

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Panel link UART
    let uart_config = UartConfig::default(); // 115200 baud default
    let tx_buf = TX_BUF.init([0u8; 64]);
    let rx_buf = RX_BUF.init([0u8; 64]);
    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();
    info!("Panel link UART initialized");

    // Coil drive outputs. Pin assignments are board-specific; the numbers
    // in config::SHAFT document the wiring, the mapping here is by
    // position (coil1..coil4 = GPIO10..GPIO13).
    let coils = [
        CoilPin::new(Output::new(p.PIN_10, Level::Low), SHAFT.motor.coil_pins[0].inverted),
        CoilPin::new(Output::new(p.PIN_11, Level::Low), SHAFT.motor.coil_pins[1].inverted),
        CoilPin::new(Output::new(p.PIN_12, Level::Low), SHAFT.motor.coil_pins[2].inverted),
        CoilPin::new(Output::new(p.PIN_13, Level::Low), SHAFT.motor.coil_pins[3].inverted),
    ];

    let mut motor = Sequencer::new(SHAFT.motor.steps_per_rev, coils, RpClock);
    motor.set_speed(SHAFT.motor.rpm);
    motor.stop();
    info!(
        "Motor sequencer initialized: {} half-steps/rev at {} RPM",
        SHAFT.motor.steps_per_rev, SHAFT.motor.rpm
    );

    // Floor sensors: active-low IR barriers on floors 0..=3
    // (GPIO16..GPIO19), none above
    let sensors = FloorSensorBank::new([
        Some(SensePin::new(Input::new(p.PIN_16, Pull::Up))),
        Some(SensePin::new(Input::new(p.PIN_17, Pull::Up))),
        Some(SensePin::new(Input::new(p.PIN_18, Pull::Up))),
        Some(SensePin::new(Input::new(p.PIN_19, Pull::Up))),
        None,
        None,
        None,
        None,
    ]);
    info!("Floor sensors initialized for {} floors", SHAFT.plan.floor_count);

    let scheduler = Scheduler::new(
        SHAFT.plan,
        SHAFT.stall,
        SHAFT.motor.burst_steps,
        SHAFT.initial_floor,
    );

    // Spawn tasks
    spawner
        .spawn(tasks::control_task(motor, sensors, scheduler))
        .unwrap();
    spawner.spawn(tasks::status_task()).unwrap();
    spawner.spawn(tasks::link_rx_task(rx)).unwrap();
    spawner.spawn(tasks::link_tx_task(tx)).unwrap();

    info!("All tasks spawned, firmware running");

    // Main task has nothing else to do - all work happens in spawned tasks
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
