// Keine Standard-Bibliothek verwenden (Embedded System)
#![no_std]
// Kein normaler main() Einstiegspunkt (wird von esp_rtos bereitgestellt)
#![no_main]
// Verbiete mem::forget - gefährlich bei ESP HAL Types mit DMA-Buffern
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
// Verbiete große Stack-Frames (Stack ist auf Embedded Systemen begrenzt)
#![deny(clippy::large_stack_frames)]

// Embassy Async Runtime
use defmt::info;
use embassy_executor::Spawner;
use embassy_sync::mutex::Mutex;
use embassy_time::{Duration, Timer};

// ESP32-C6 HAL
use esp_hal::clock::CpuClock;
use esp_hal::gpio::{Input, InputConfig, Pull};
use esp_hal::timer::timg::TimerGroup;
use esp_hal::uart::{self, Uart};
use esp_hal_smartled::smart_led_buffer;
use static_cell::StaticCell;

// Backtrace bei Panic und println!() Support
use {esp_backtrace as _, esp_println as _};

// Projekt-Module und Konfiguration
use esp_signal_tasks::config::{
    BUTTON_GREEN_GPIO, BUTTON_RED_GPIO, BUTTON_YELLOW_GPIO, LED_BRIGHTNESS, RMT_CLOCK_MHZ,
    SIGNAL_ROSTER, UART_BAUD_RATE, UART_RX_GPIO, UART_TX_GPIO,
};
use esp_signal_tasks::hal::{LedBuffer, RmtLedWriter};
use esp_signal_tasks::tasks::{button_task, heartbeat_task, input_dispatch_task, signal_task};
use esp_signal_tasks::{InputEventChannel, RmtIndicator, wake_slot};
use signal_core::{Indicator, IndicatorArbiter};

// ESP-IDF App Descriptor - erforderlich für den Bootloader!
// Ohne diesen schlägt das Flashen mit "ESP-IDF App Descriptor missing" fehl
esp_bootloader_esp_idf::esp_app_desc!();

/// Main Entry Point
///
/// Initialisiert Hardware, löscht die LED, startet Embassy Runtime und
/// spawnt alle Tasks. Danach schläft main() - alle Arbeit läuft in Tasks.
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    // ESP32-C6 Konfiguration: CPU auf maximale Taktfrequenz (160 MHz)
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    // Embassy Runtime initialisieren (Timer + Software Interrupt)
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_interrupt =
        esp_hal::interrupt::software::SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_interrupt.software_interrupt0);

    // Indikator-LED: RMT-Buffer muss 'static sein, weil der Writer im
    // geteilten Arbiter lebt
    static LED_BUFFER: StaticCell<LedBuffer> = StaticCell::new();
    let led_buffer = LED_BUFFER.init(smart_led_buffer!(1));
    let led = RmtLedWriter::new(peripherals.GPIO8, peripherals.RMT, RMT_CLOCK_MHZ, led_buffer)
        .expect("Failed to initialize RMT for the indicator LED");

    // Boot-Zustand: keine Claims, LED aus
    let mut arbiter = IndicatorArbiter::new(Indicator::new(led, LED_BRIGHTNESS));
    arbiter.reset().expect("Failed to clear the indicator LED");

    static INDICATOR: StaticCell<RmtIndicator> = StaticCell::new();
    let indicator = &*INDICATOR.init(Mutex::new(arbiter));

    // Spawn Signal Tasks (ein Task pro Roster-Eintrag, alle Dormant)
    for spec in SIGNAL_ROSTER {
        spawner
            .spawn(signal_task(spec, wake_slot(spec.color), indicator))
            .unwrap();
    }

    // UART1: 8N1, keine Flusskontrolle
    let uart = Uart::new(
        peripherals.UART1,
        uart::Config::default().with_baudrate(UART_BAUD_RATE),
    )
    .expect("Failed to initialize UART1")
    .with_rx(peripherals.GPIO17)
    .with_tx(peripherals.GPIO16)
    .into_async();
    let (uart_rx, uart_tx) = uart.split();

    // Taster-Channel erstellen (Taster-Tasks → Dispatcher)
    static INPUT_CHANNEL: StaticCell<InputEventChannel> = StaticCell::new();
    let input_channel = INPUT_CHANNEL.init(InputEventChannel::new());

    // Spawn Dispatcher Task (UART + Taster)
    spawner
        .spawn(input_dispatch_task(uart_rx, input_channel.receiver()))
        .unwrap();

    // Spawn Button Tasks (Pull-up, gedrückt = Low)
    let button_config = InputConfig::default().with_pull(Pull::Up);
    let red = Input::new(peripherals.GPIO6, button_config);
    let yellow = Input::new(peripherals.GPIO5, button_config);
    let green = Input::new(peripherals.GPIO4, button_config);
    for (pin, input) in [
        (BUTTON_RED_GPIO, red),
        (BUTTON_YELLOW_GPIO, yellow),
        (BUTTON_GREEN_GPIO, green),
    ] {
        spawner
            .spawn(button_task(pin, input, input_channel.sender()))
            .unwrap();
    }

    // Spawn Heartbeat Task
    spawner.spawn(heartbeat_task(uart_tx)).unwrap();

    info!(
        "Boot: {} signal tasks ready, UART1 {} baud (RX GPIO{}, TX GPIO{})",
        SIGNAL_ROSTER.len(),
        UART_BAUD_RATE,
        UART_RX_GPIO,
        UART_TX_GPIO
    );

    // Main-Loop: schläft (alle Arbeit läuft in Tasks)
    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}
