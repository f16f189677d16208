//! Hardware Abstraction Traits
//!
//! Diese Traits definieren Schnittstellen für Hardware-Zugriff
//! ohne konkrete Implementierung.

use core::time::Duration;

use rgb::RGB8;

/// Fehler-Typ für LED-Operationen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedError {
    /// Peripheral konnte nicht initialisiert werden
    InitFailed,
    WriteFailed,
}

/// Trait für SmartLED Hardware-Zugriff
///
/// Abstrahiert den Zugriff auf die Indikator-LED (WS2812/Neopixel).
///
/// # Implementierungen
/// - **Production:** RmtLedWriter (ESP32 RMT Peripheral)
/// - **Testing:** MockLedWriter (in-memory Mock)
pub trait SmartLedWriter: Send {
    /// Schreibt eine RGB-Farbe auf die LED und refresht sie
    ///
    /// # Fehlerbehandlung
    /// Gibt `LedError::WriteFailed` zurück wenn Hardware-Zugriff fehlschlägt
    fn write(&mut self, color: RGB8) -> Result<(), LedError>;

    /// Schaltet die LED aus
    fn clear(&mut self) -> Result<(), LedError> {
        self.write(RGB8::default())
    }
}

/// Monotone Uhr seit Systemstart
pub trait Clock {
    fn elapsed(&self) -> Duration;
}

#[cfg(feature = "defmt")]
impl defmt::Format for LedError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            LedError::InitFailed => defmt::write!(fmt, "LED init failed"),
            LedError::WriteFailed => defmt::write!(fmt, "LED write failed"),
        }
    }
}
