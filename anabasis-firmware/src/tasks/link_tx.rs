//! Panel link transmit task
//!
//! Owns the UART transmit half and drains the outbound report channel.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use anabasis_protocol::MAX_FRAME_LEN;

use crate::channels::OUTBOUND;

/// Link TX task - encodes queued reports onto the wire
#[embassy_executor::task]
pub async fn link_tx_task(mut tx: BufferedUartTx) {
    info!("Link TX task started");

    loop {
        let report = OUTBOUND.receive().await;

        let frame = match report.to_frame() {
            Ok(frame) => frame,
            Err(e) => {
                // Reports are fixed-size and tiny; this cannot happen short
                // of a protocol bug
                warn!("Failed to frame report: {:?}", e);
                continue;
            }
        };

        let mut buf = [0u8; MAX_FRAME_LEN];
        match frame.encode(&mut buf) {
            Ok(len) => {
                if let Err(e) = tx.write_all(&buf[..len]).await {
                    warn!("Link write failed: {:?}", e);
                }
            }
            Err(e) => warn!("Failed to encode frame: {:?}", e),
        }
    }
}
