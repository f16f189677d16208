// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen
#![allow(dead_code)]

use embassy_time::Duration;
use signal_core::{ButtonBinding, SignalColor, SignalSpec};

// ============================================================================
// LED Konfiguration
// ============================================================================

/// GPIO-Pin für die RGB LED (WS2812/Neopixel)
pub const LED_GPIO_PIN: u8 = 8;

/// Helligkeits-Level für die LED (0-255)
/// Wert ist gedimmt für Augenschonung
pub const LED_BRIGHTNESS: u8 = 16;

/// RMT Taktfrequenz in MHz
/// 80 MHz ist optimal für WS2812 LED-Timing
pub const RMT_CLOCK_MHZ: u32 = 80;

/// Anzahl der LEDs im Strip
pub const LED_COUNT: usize = 1;

// ============================================================================
// Signal-Task Konfiguration
// ============================================================================

/// Länge eines Ticks
pub const SIGNAL_TICK: core::time::Duration = core::time::Duration::from_secs(1);

/// Aktive Laufzeit in Ticks
pub const SIGNAL_RUN_TICKS: u8 = 3;

/// Prioritäten: höhere Zahl gewinnt die LED
pub const RED_PRIORITY: u8 = 3;
pub const YELLOW_PRIORITY: u8 = 2;
pub const GREEN_PRIORITY: u8 = 1;

/// Roster: ein Signal-Task pro Eintrag
pub const SIGNAL_ROSTER: [SignalSpec; 3] = [
    SignalSpec::new(SignalColor::Red, RED_PRIORITY, SIGNAL_RUN_TICKS, SIGNAL_TICK),
    SignalSpec::new(SignalColor::Yellow, YELLOW_PRIORITY, SIGNAL_RUN_TICKS, SIGNAL_TICK),
    SignalSpec::new(SignalColor::Green, GREEN_PRIORITY, SIGNAL_RUN_TICKS, SIGNAL_TICK),
];

// ============================================================================
// Taster Konfiguration
// ============================================================================

/// Taster-GPIOs (Pull-up, gedrückt = Low)
pub const BUTTON_RED_GPIO: u8 = 6;
pub const BUTTON_YELLOW_GPIO: u8 = 5;
pub const BUTTON_GREEN_GPIO: u8 = 4;

/// Zuordnung Taster → Farbe
pub const BUTTON_BINDINGS: [ButtonBinding; 3] = [
    ButtonBinding {
        pin: BUTTON_RED_GPIO,
        color: SignalColor::Red,
    },
    ButtonBinding {
        pin: BUTTON_YELLOW_GPIO,
        color: SignalColor::Yellow,
    },
    ButtonBinding {
        pin: BUTTON_GREEN_GPIO,
        color: SignalColor::Green,
    },
];

/// Entprell-Zeit nach jeder Flanke
pub const BUTTON_DEBOUNCE: Duration = Duration::from_millis(50);

/// Queue-Tiefe für Taster-Events (ISR → Dispatcher)
pub const BUTTON_QUEUE_DEPTH: usize = 10;

// ============================================================================
// UART Konfiguration
// ============================================================================

/// Baudrate (8N1, keine Flusskontrolle)
pub const UART_BAUD_RATE: u32 = 115_200;

/// UART1 Pins
pub const UART_RX_GPIO: u8 = 17;
pub const UART_TX_GPIO: u8 = 16;

/// Empfangs-Buffer pro Lesevorgang in Bytes
pub const UART_RX_BUFFER_SIZE: usize = 128;

/// Heartbeat-Nachricht und Intervall
pub const HEARTBEAT_MESSAGE: &[u8] = b"Hello world.\n";
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(2);

// ============================================================================
// Dispatcher Konfiguration
// ============================================================================

/// Maximale Wartezeit auf ein Event, danach Housekeeping
/// (angefangene Tokens verwerfen)
pub const DISPATCH_TIMEOUT: Duration = Duration::from_millis(100);
