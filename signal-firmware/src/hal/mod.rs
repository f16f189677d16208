// Hardware Abstraction Layer (HAL) Module
//
// Dieses Modul kapselt Hardware-Zugriffe hinter den Traits aus signal-core,
// um Testbarkeit und Wartbarkeit zu verbessern.

pub mod clock;
pub mod led_writer;

pub use clock::{EmbassyClock, instant_at};
pub use led_writer::{LED_BUFFER_SIZE, LedBuffer, RmtLedWriter};
