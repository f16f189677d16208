// Dispatcher Task - UART-Kommandos und Taster-Events → Weckrufe
use defmt::{Debug2Format, debug, error, info, warn};
use embassy_futures::select::{Either, select};
use embassy_time::with_timeout;
use esp_hal::Async;
use esp_hal::uart::UartRx;
use signal_core::{DEFAULT_COMMANDS, Dispatch, InputDispatcher, WakeOutcome};

use crate::config::{BUTTON_BINDINGS, DISPATCH_TIMEOUT, SIGNAL_ROSTER, UART_RX_BUFFER_SIZE};
use crate::{InputEventReceiver, wake_slot};

/// Dispatcher Task - multiplext beide Eingabekanäle
///
/// Dieser Task:
/// - Wartet gleichzeitig auf UART-Bytes und Taster-Events (`select`)
/// - Wartet höchstens `DISPATCH_TIMEOUT`, danach Housekeeping
///   (angefangene Tokens werden als unbekannt verworfen)
/// - Dekodiert Tokens über `InputDispatcher` aus signal-core
/// - Weckt den zugehörigen Signal-Task
///
/// Keiner der beiden Kanäle hat Vorrang: welcher zuerst bedient wird,
/// entscheidet `select` pro Durchlauf.
///
/// # Parameter
/// - `uart_rx`: Empfangsseite von UART1
/// - `button_events`: Channel Receiver für Taster-Events
#[embassy_executor::task]
pub async fn input_dispatch_task(mut uart_rx: UartRx<'static, Async>, button_events: InputEventReceiver) {
    info!("Dispatch: Task started");

    let mut dispatcher = InputDispatcher::new(&DEFAULT_COMMANDS, &BUTTON_BINDINGS);
    let mut rx_buffer = [0u8; UART_RX_BUFFER_SIZE];

    loop {
        let next = with_timeout(
            DISPATCH_TIMEOUT,
            select(uart_rx.read_async(&mut rx_buffer), button_events.receive()),
        )
        .await;

        match next {
            Ok(Either::First(Ok(len))) => {
                debug!("Dispatch: read {} bytes: {=[u8]:a}", len, &rx_buffer[..len]);
                for &byte in &rx_buffer[..len] {
                    dispatcher.on_serial_byte(byte).into_iter().for_each(route);
                }
            }
            Ok(Either::First(Err(e))) => {
                warn!("Dispatch: UART read error: {}", Debug2Format(&e));
            }
            Ok(Either::Second(event)) => {
                debug!("Dispatch: {}", event);
                dispatcher.handle(event).into_iter().for_each(route);
            }
            Err(_timeout) => {
                if let Some(dispatch) = dispatcher.on_idle() {
                    route(dispatch);
                }
            }
        }
    }
}

/// Führt eine Dispatcher-Entscheidung aus
///
/// Unbekannte Eingaben werden geloggt und verworfen, nie propagiert.
fn route(dispatch: Dispatch) {
    match dispatch {
        Dispatch::Wake(color) => {
            if !SIGNAL_ROSTER.iter().any(|spec| spec.color == color) {
                error!("Dispatch: no signal task for {}", color);
                return;
            }
            let slot = wake_slot(color);
            match slot.wake() {
                WakeOutcome::Started => info!("Dispatch: waking {} task", color),
                WakeOutcome::AlreadyActive if slot.is_active() => {
                    info!("Dispatch: {} task already active, wake has no effect", color)
                }
                WakeOutcome::AlreadyActive => {
                    info!("Dispatch: {} task already woken, wakes coalesced", color)
                }
            }
        }
        Dispatch::ToggleFollower => {
            // Mesh-Anbindung fehlt in dieser Firmware
            warn!("Dispatch: follower_toggle_led received, no mesh link attached");
        }
        Dispatch::Ignored(reason) => debug!("Dispatch: ignored {}", reason),
        Dispatch::Unrecognized(bytes) => {
            error!(
                "Dispatch: did not understand command '{=[u8]:a}'",
                bytes.as_slice()
            );
        }
    }
}
