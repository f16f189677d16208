//! Input Dispatcher
//!
//! Übersetzt rohe Eingaben (Taster-Flanken und UART-Bytes) in
//! Weckrufe für Signal-Tasks. Unbekannte Eingaben werden gemeldet,
//! nie stillschweigend verschluckt.

use heapless::Vec;

use crate::command::{ButtonBinding, Command, CommandToken, Decoded, LineDecoder, TokenBuffer};
use crate::types::{Edge, InputEvent, SignalColor};

/// Grund für eine ignorierte Eingabe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Loslassen-Flanke, nur Drücken weckt
    Released { pin: u8 },
    /// Taster ohne Zuordnung
    UnmappedPin(u8),
}

/// Entscheidung des Dispatchers für ein Event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Wake(SignalColor),
    ToggleFollower,
    Ignored(IgnoreReason),
    Unrecognized(TokenBuffer),
}

/// Entscheidungen zu einem Event
///
/// Leer solange ein serielles Token unvollständig ist. Zwei Einträge, wenn
/// ein Byte einen verworfenen Rest abschließt und zugleich ein Token beendet.
pub type Dispatches = Vec<Dispatch, 2>;

impl From<Decoded> for Dispatch {
    fn from(decoded: Decoded) -> Self {
        match decoded {
            Decoded::Command(Command::Wake(color)) => Dispatch::Wake(color),
            Decoded::Command(Command::ToggleFollower) => Dispatch::ToggleFollower,
            Decoded::Unrecognized(bytes) => Dispatch::Unrecognized(bytes),
        }
    }
}

/// Multiplexer für Taster- und UART-Eingaben
pub struct InputDispatcher<'a> {
    buttons: &'a [ButtonBinding],
    decoder: LineDecoder<'a>,
}

impl<'a> InputDispatcher<'a> {
    pub fn new(commands: &'a [CommandToken], buttons: &'a [ButtonBinding]) -> Self {
        Self {
            buttons,
            decoder: LineDecoder::new(commands),
        }
    }

    /// Verarbeitet ein rohes Event
    pub fn handle(&mut self, event: InputEvent) -> Dispatches {
        match event {
            InputEvent::Button { pin, edge } => {
                core::iter::once(self.on_button(pin, edge)).collect()
            }
            InputEvent::Serial(byte) => self.on_serial_byte(byte),
        }
    }

    pub fn on_serial_byte(&mut self, byte: u8) -> Dispatches {
        self.decoder.push(byte).map(Dispatch::from).collect()
    }

    pub fn on_button(&mut self, pin: u8, edge: Edge) -> Dispatch {
        let Some(binding) = self.buttons.iter().find(|b| b.pin == pin) else {
            return Dispatch::Ignored(IgnoreReason::UnmappedPin(pin));
        };
        match edge {
            Edge::Down => Dispatch::Wake(binding.color),
            Edge::Up => Dispatch::Ignored(IgnoreReason::Released { pin }),
        }
    }

    /// Housekeeping nach einem Timeout ohne Eingabe
    ///
    /// Ein angefangenes Token gilt dann als abgeschlossen und unbekannt.
    pub fn on_idle(&mut self) -> Option<Dispatch> {
        self.decoder.flush().map(Dispatch::from)
    }

    /// Bytes, die noch auf ein Token warten
    pub fn pending(&self) -> &[u8] {
        self.decoder.pending()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for IgnoreReason {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            IgnoreReason::Released { pin } => defmt::write!(fmt, "released edge on GPIO{}", pin),
            IgnoreReason::UnmappedPin(pin) => defmt::write!(fmt, "unmapped GPIO{}", pin),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Dispatch {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Dispatch::Wake(color) => defmt::write!(fmt, "Wake({})", color),
            Dispatch::ToggleFollower => defmt::write!(fmt, "ToggleFollower"),
            Dispatch::Ignored(reason) => defmt::write!(fmt, "Ignored({})", reason),
            Dispatch::Unrecognized(bytes) => {
                defmt::write!(fmt, "Unrecognized({=[u8]:a})", bytes.as_slice())
            }
        }
    }
}
