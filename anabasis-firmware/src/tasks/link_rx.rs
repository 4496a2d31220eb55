//! Panel link receive task
//!
//! Owns the UART receive half. Feeds raw bytes to the frame parser and
//! applies complete commands: floor calls go into the shared request table,
//! pings are answered on the outbound channel.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use anabasis_protocol::{CabinReport, FrameParser, PanelCommand};

use crate::channels::{CABIN, OUTBOUND};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 32;

/// Link RX task - receives and parses frames from the panel
#[embassy_executor::task]
pub async fn link_rx_task(mut rx: BufferedUartRx) {
    info!("Link RX task started");

    let mut parser = FrameParser::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                for &byte in &buf[..n] {
                    match parser.feed(byte) {
                        Ok(Some(frame)) => match PanelCommand::from_frame(&frame) {
                            Ok(command) => handle_command(command).await,
                            Err(e) => warn!("Unusable frame from panel: {:?}", e),
                        },
                        Ok(None) => {
                            // Mid-frame, keep feeding
                        }
                        Err(e) => {
                            // Parser has already resynchronized
                            warn!("Frame error on panel link: {:?}", e);
                        }
                    }
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}

async fn handle_command(command: PanelCommand) {
    match command {
        PanelCommand::Call { floor } => {
            let mut cabin = CABIN.lock().await;
            if cabin.requests.request(floor) {
                debug!("Floor {} requested", floor);
            } else {
                // A byte naming a floor this shaft does not serve is
                // dropped, never an error
                debug!("Ignoring out-of-range floor request {}", floor);
            }
        }
        PanelCommand::Ping => {
            let _ = OUTBOUND.try_send(CabinReport::Pong);
        }
    }
}
