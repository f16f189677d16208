// Heartbeat Task - sendet periodisch eine feste Nachricht über UART
use defmt::{Debug2Format, info, warn};
use embassy_time::Timer;
use esp_hal::Async;
use esp_hal::uart::UartTx;

use crate::config::{HEARTBEAT_INTERVAL, HEARTBEAT_MESSAGE};

/// Heartbeat Task
///
/// Unabhängig vom Kommando-Kanal: sendet alle `HEARTBEAT_INTERVAL`
/// die Nachricht `HEARTBEAT_MESSAGE`, egal was empfangen wurde.
#[embassy_executor::task]
pub async fn heartbeat_task(mut uart_tx: UartTx<'static, Async>) {
    info!("Heartbeat: Task started");

    loop {
        match uart_tx.write_async(HEARTBEAT_MESSAGE).await {
            Ok(written) => info!("Heartbeat: wrote {} bytes", written),
            Err(e) => warn!("Heartbeat: UART write error: {}", Debug2Format(&e)),
        }
        Timer::after(HEARTBEAT_INTERVAL).await;
    }
}
