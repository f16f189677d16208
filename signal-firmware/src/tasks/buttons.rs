// Button Task - meldet Taster-Flanken an den Dispatcher
use defmt::info;
use embassy_time::Timer;
use esp_hal::gpio::Input;
use signal_core::{Edge, InputEvent};

use crate::InputEventSender;
use crate::config::BUTTON_DEBOUNCE;

/// Button Task - ein Task pro Taster
///
/// Pull-up Verdrahtung: Drücken erzeugt eine fallende Flanke (`Edge::Down`),
/// Loslassen eine steigende (`Edge::Up`). Nach jeder Flanke wird
/// `BUTTON_DEBOUNCE` gewartet, Prellen geht so nicht in die Queue.
///
/// Die Auswertung (nur `Down` weckt) passiert im Dispatcher.
///
/// # Parameter
/// - `pin`: GPIO-Nummer für die Zuordnung im Dispatcher
/// - `button`: konfigurierter Eingang mit Pull-up
/// - `events`: Channel Sender zum Dispatcher
#[embassy_executor::task(pool_size = 3)]
pub async fn button_task(pin: u8, mut button: Input<'static>, events: InputEventSender) {
    info!("Button: GPIO{} ready", pin);

    loop {
        button.wait_for_falling_edge().await;
        events
            .send(InputEvent::Button {
                pin,
                edge: Edge::Down,
            })
            .await;
        Timer::after(BUTTON_DEBOUNCE).await;

        button.wait_for_high().await;
        events
            .send(InputEvent::Button {
                pin,
                edge: Edge::Up,
            })
            .await;
        Timer::after(BUTTON_DEBOUNCE).await;
    }
}
