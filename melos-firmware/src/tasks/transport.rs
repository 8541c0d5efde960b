//! Event transport task
//!
//! Reads the byte stream from the network bridge and splits it into
//! newline-terminated payload lines for the engine.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use melos_protocol::RawPayload;

use crate::channels::RAW_EVENTS;

/// Buffer size for UART reads
const RX_BUF_SIZE: usize = 64;

/// Transport task - frames the feed and queues complete payloads
#[embassy_executor::task]
pub async fn transport_task(mut rx: BufferedUartRx<'static>) {
    info!("Transport task started");

    let mut line = RawPayload::new();
    let mut overflow = false;
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                for &byte in &buf[..n] {
                    if byte == b'\n' {
                        if overflow {
                            // the rest of an oversized line; drop it whole
                            warn!("Oversized payload dropped");
                            overflow = false;
                            line.clear();
                            continue;
                        }
                        if line.is_empty() {
                            continue;
                        }
                        let payload = core::mem::take(&mut line);
                        if RAW_EVENTS.try_send(payload).is_err() {
                            warn!("Event queue full, dropping payload");
                        }
                    } else if !overflow && line.push(byte).is_err() {
                        overflow = true;
                    }
                }
            }
            Ok(_) => {
                // No bytes read, continue
            }
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}
