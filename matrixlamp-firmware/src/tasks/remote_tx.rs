//! Remote UART transmit task

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use matrixlamp_protocol::frame::MAX_FRAME_SIZE;

use crate::channels::RESPONSES;

/// Remote TX task - sends queued responses to the remote controller
#[embassy_executor::task]
pub async fn remote_tx_task(mut tx: BufferedUartTx) {
    info!("Remote TX task started");

    let mut buf = [0u8; MAX_FRAME_SIZE];
    loop {
        let response = RESPONSES.receive().await;

        let frame = match response.to_frame() {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Cannot frame response {}: {}", response, e);
                continue;
            }
        };
        let len = match frame.encode(&mut buf) {
            Ok(len) => len,
            Err(e) => {
                warn!("Cannot encode response: {}", e);
                continue;
            }
        };
        match tx.write_all(&buf[..len]).await {
            Ok(()) => trace!("TX: {}", response),
            Err(e) => warn!("UART write error: {:?}", e),
        }
    }
}
