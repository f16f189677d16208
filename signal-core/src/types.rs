//! Core Types für die Signal-Tasks
//!
//! Datenstrukturen ohne Hardware-Dependencies

use rgb::RGB8;

/// Standard-Helligkeit (0-255)
///
/// Die Firmware übergibt ihren eigenen Wert aus `config.rs`,
/// signal-core hat darauf keinen Zugriff.
pub const DEFAULT_BRIGHTNESS: u8 = 16;

/// Farbe eines Signal-Tasks
///
/// Jeder Signal-Task besitzt genau eine Farbe. Die Menge ist erweiterbar,
/// nicht jede Farbe braucht einen Task im Roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SignalColor {
    Red,
    Yellow,
    Green,
    Blue,
}

impl SignalColor {
    /// Alle bekannten Farben in Code-Reihenfolge
    pub const ALL: [SignalColor; 4] = [
        SignalColor::Red,
        SignalColor::Yellow,
        SignalColor::Green,
        SignalColor::Blue,
    ];

    /// RGB-Wert der Farbe bei gegebener Helligkeit
    ///
    /// Gelb mischt Rot mit halber Helligkeit Grün.
    ///
    /// ```
    /// # use rgb::RGB8;
    /// # use signal_core::SignalColor;
    /// assert_eq!(SignalColor::Yellow.rgb(16), RGB8 { r: 16, g: 8, b: 0 });
    /// ```
    pub fn rgb(self, brightness: u8) -> RGB8 {
        match self {
            SignalColor::Red => RGB8 {
                r: brightness,
                g: 0,
                b: 0,
            },
            SignalColor::Yellow => RGB8 {
                r: brightness,
                g: brightness / 2,
                b: 0,
            },
            SignalColor::Green => RGB8 {
                r: 0,
                g: brightness,
                b: 0,
            },
            SignalColor::Blue => RGB8 {
                r: 0,
                g: 0,
                b: brightness,
            },
        }
    }

    /// Name für Logs
    pub fn as_str(self) -> &'static str {
        match self {
            SignalColor::Red => "red",
            SignalColor::Yellow => "yellow",
            SignalColor::Green => "green",
            SignalColor::Blue => "blue",
        }
    }
}

/// Sichtbarer Zustand der Indikator-LED
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IndicatorState {
    #[default]
    Off,
    Lit(SignalColor),
}

impl IndicatorState {
    /// Roh-Code für externe Kodierungen (0 = Off, 1.. = Farben)
    pub fn code(self) -> u8 {
        match self {
            IndicatorState::Off => 0,
            IndicatorState::Lit(SignalColor::Red) => 1,
            IndicatorState::Lit(SignalColor::Yellow) => 2,
            IndicatorState::Lit(SignalColor::Green) => 3,
            IndicatorState::Lit(SignalColor::Blue) => 4,
        }
    }

    /// RGB-Wert, Off ist schwarz
    pub fn rgb(self, brightness: u8) -> RGB8 {
        match self {
            IndicatorState::Off => RGB8::default(),
            IndicatorState::Lit(color) => color.rgb(brightness),
        }
    }
}

/// Roh-Code außerhalb des gültigen Bereichs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateCodeError(pub u8);

impl TryFrom<u8> for IndicatorState {
    type Error = StateCodeError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(IndicatorState::Off),
            1 => Ok(IndicatorState::Lit(SignalColor::Red)),
            2 => Ok(IndicatorState::Lit(SignalColor::Yellow)),
            3 => Ok(IndicatorState::Lit(SignalColor::Green)),
            4 => Ok(IndicatorState::Lit(SignalColor::Blue)),
            other => Err(StateCodeError(other)),
        }
    }
}

/// Flanke eines Tasters
///
/// Pull-up Verdrahtung: `Down` = gedrückt (fallende Flanke).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Down,
    Up,
}

/// Rohes Eingabe-Event von einem der beiden Kanäle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Taster-Flanke an einem GPIO
    Button { pin: u8, edge: Edge },
    /// Ein empfangenes UART-Byte
    Serial(u8),
}

// ============================================================================
// defmt::Format Implementations (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for SignalColor {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{=str}", self.as_str())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for IndicatorState {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            IndicatorState::Off => defmt::write!(fmt, "Off"),
            IndicatorState::Lit(color) => defmt::write!(fmt, "Lit({})", color),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for StateCodeError {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "invalid indicator state code {}", self.0)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Edge {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Edge::Down => defmt::write!(fmt, "Down"),
            Edge::Up => defmt::write!(fmt, "Up"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for InputEvent {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            InputEvent::Button { pin, edge } => {
                defmt::write!(fmt, "Button {{ pin: {}, edge: {} }}", pin, edge)
            }
            InputEvent::Serial(byte) => defmt::write!(fmt, "Serial({=u8:#04x})", byte),
        }
    }
}
