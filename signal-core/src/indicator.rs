//! Indikator-LED und Arbitrierung
//!
//! `Indicator` schreibt jeden Aufruf direkt auf die Hardware durch.
//! `IndicatorArbiter` ist der einzige Schreiber: er hält pro aktiver Farbe
//! einen Claim und zeigt immer den Claim mit der höchsten Priorität.

use crate::traits::{LedError, SmartLedWriter};
use crate::types::{IndicatorState, SignalColor, StateCodeError};

/// Fehler beim Anwenden eines Roh-Codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyError {
    /// Code ungültig, LED wurde ausgeschaltet
    InvalidCode(StateCodeError),
    Led(LedError),
}

impl From<LedError> for ApplyError {
    fn from(e: LedError) -> Self {
        ApplyError::Led(e)
    }
}

/// Die physische Indikator-LED samt zuletzt geschriebenem Zustand
pub struct Indicator<W: SmartLedWriter> {
    writer: W,
    state: IndicatorState,
    brightness: u8,
}

impl<W: SmartLedWriter> Indicator<W> {
    /// Erstellt den Indikator ohne auf die Hardware zu schreiben
    pub fn new(writer: W, brightness: u8) -> Self {
        Self {
            writer,
            state: IndicatorState::Off,
            brightness,
        }
    }

    /// Setzt die LED auf eine Farbe (immer mit Hardware-Refresh)
    pub fn set(&mut self, color: SignalColor) -> Result<(), LedError> {
        self.writer.write(color.rgb(self.brightness))?;
        self.state = IndicatorState::Lit(color);
        Ok(())
    }

    /// Schaltet die LED aus. Auf einer bereits ausgeschalteten LED harmlos.
    pub fn clear(&mut self) -> Result<(), LedError> {
        self.writer.clear()?;
        self.state = IndicatorState::Off;
        Ok(())
    }

    /// Zeigt einen beliebigen Zustand an
    pub fn show(&mut self, state: IndicatorState) -> Result<(), LedError> {
        match state {
            IndicatorState::Off => self.clear(),
            IndicatorState::Lit(color) => self.set(color),
        }
    }

    /// Wendet einen Roh-Code an (z.B. aus einer externen Kodierung)
    ///
    /// Ungültige Codes schalten die LED aus und werden als Fehler gemeldet.
    pub fn apply_raw(&mut self, code: u8) -> Result<IndicatorState, ApplyError> {
        match IndicatorState::try_from(code) {
            Ok(state) => {
                self.show(state)?;
                Ok(state)
            }
            Err(e) => {
                self.clear()?;
                Err(ApplyError::InvalidCode(e))
            }
        }
    }

    pub fn state(&self) -> IndicatorState {
        self.state
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }
}

#[derive(Debug, Clone, Copy)]
struct Claim {
    priority: u8,
    // Reihenfolge des Hinzukommens, entscheidet bei gleicher Priorität
    order: u32,
}

/// Einziger Schreibzugang zur Indikator-LED
///
/// Sichtbar ist der Claim mit der höchsten Priorität; bei gleicher
/// Priorität gewinnt der zuletzt hinzugekommene. Geschrieben wird nur,
/// wenn sich der sichtbare Zustand ändert.
pub struct IndicatorArbiter<W: SmartLedWriter> {
    indicator: Indicator<W>,
    // Ein Platz pro Farbe, indiziert über `SignalColor as usize`
    claims: [Option<Claim>; SignalColor::ALL.len()],
    next_order: u32,
}

impl<W: SmartLedWriter> IndicatorArbiter<W> {
    pub fn new(indicator: Indicator<W>) -> Self {
        Self {
            indicator,
            claims: [None; SignalColor::ALL.len()],
            next_order: 0,
        }
    }

    /// Verwirft alle Claims und schaltet die LED bedingungslos aus
    pub fn reset(&mut self) -> Result<(), LedError> {
        self.claims = [None; SignalColor::ALL.len()];
        self.indicator.clear()
    }

    /// Beansprucht (oder bestätigt) die LED für eine Farbe
    pub fn assert(
        &mut self,
        color: SignalColor,
        priority: u8,
    ) -> Result<IndicatorState, LedError> {
        match &mut self.claims[color as usize] {
            Some(claim) => claim.priority = priority,
            slot @ None => {
                *slot = Some(Claim {
                    priority,
                    order: self.next_order,
                });
                self.next_order = self.next_order.wrapping_add(1);
            }
        }
        self.refresh()
    }

    /// Gibt den Claim einer Farbe frei
    pub fn release(&mut self, color: SignalColor) -> Result<IndicatorState, LedError> {
        self.claims[color as usize] = None;
        self.refresh()
    }

    /// Zustand, der laut Claims sichtbar sein soll
    pub fn visible(&self) -> IndicatorState {
        SignalColor::ALL
            .into_iter()
            .filter_map(|color| self.claims[color as usize].map(|claim| (claim, color)))
            .max_by_key(|(claim, _)| (claim.priority, claim.order))
            .map_or(IndicatorState::Off, |(_, color)| IndicatorState::Lit(color))
    }

    /// Tatsächlich zuletzt geschriebener Zustand
    pub fn state(&self) -> IndicatorState {
        self.indicator.state()
    }

    pub fn indicator(&self) -> &Indicator<W> {
        &self.indicator
    }

    pub fn indicator_mut(&mut self) -> &mut Indicator<W> {
        &mut self.indicator
    }

    fn refresh(&mut self) -> Result<IndicatorState, LedError> {
        let target = self.visible();
        if target != self.indicator.state() {
            self.indicator.show(target)?;
        }
        Ok(target)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ApplyError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            ApplyError::InvalidCode(e) => defmt::write!(fmt, "{}", e),
            ApplyError::Led(e) => defmt::write!(fmt, "{}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rgb::RGB8;

    struct CountingWriter {
        writes: usize,
        last: Option<RGB8>,
    }

    impl SmartLedWriter for CountingWriter {
        fn write(&mut self, color: RGB8) -> Result<(), LedError> {
            self.writes += 1;
            self.last = Some(color);
            Ok(())
        }
    }

    fn arbiter() -> IndicatorArbiter<CountingWriter> {
        IndicatorArbiter::new(Indicator::new(
            CountingWriter {
                writes: 0,
                last: None,
            },
            16,
        ))
    }

    #[test]
    fn test_higher_priority_stays_visible() {
        let mut arb = arbiter();
        arb.assert(SignalColor::Red, 3).unwrap();
        let shown = arb.assert(SignalColor::Green, 1).unwrap();
        assert_eq!(shown, IndicatorState::Lit(SignalColor::Red));
        assert_eq!(arb.indicator().writer().writes, 1);
    }

    #[test]
    fn test_release_falls_back_to_remaining_claim() {
        let mut arb = arbiter();
        arb.assert(SignalColor::Red, 3).unwrap();
        arb.assert(SignalColor::Green, 1).unwrap();
        let shown = arb.release(SignalColor::Red).unwrap();
        assert_eq!(shown, IndicatorState::Lit(SignalColor::Green));
        assert_eq!(
            arb.indicator().writer().last,
            Some(RGB8 { r: 0, g: 16, b: 0 })
        );
    }

    #[test]
    fn test_reassert_without_change_does_not_write() {
        let mut arb = arbiter();
        arb.assert(SignalColor::Yellow, 2).unwrap();
        arb.assert(SignalColor::Yellow, 2).unwrap();
        arb.assert(SignalColor::Yellow, 2).unwrap();
        assert_eq!(arb.indicator().writer().writes, 1);
    }

    #[test]
    fn test_equal_priority_latest_claim_wins() {
        let mut arb = arbiter();
        arb.assert(SignalColor::Red, 1).unwrap();
        let shown = arb.assert(SignalColor::Blue, 1).unwrap();
        assert_eq!(shown, IndicatorState::Lit(SignalColor::Blue));
    }

    #[test]
    fn test_every_color_holds_a_claim() {
        let mut arb = arbiter();
        for (priority, color) in SignalColor::ALL.into_iter().enumerate() {
            arb.assert(color, priority as u8).unwrap();
        }
        assert_eq!(arb.visible(), IndicatorState::Lit(SignalColor::Blue));

        for color in SignalColor::ALL.into_iter().rev() {
            arb.release(color).unwrap();
        }
        assert_eq!(arb.state(), IndicatorState::Off);
    }

    #[test]
    fn test_reclaim_after_release_counts_as_latest() {
        let mut arb = arbiter();
        arb.assert(SignalColor::Red, 1).unwrap();
        arb.assert(SignalColor::Green, 1).unwrap();
        arb.release(SignalColor::Red).unwrap();
        let shown = arb.assert(SignalColor::Red, 1).unwrap();
        assert_eq!(shown, IndicatorState::Lit(SignalColor::Red));
    }

    #[test]
    fn test_apply_raw_invalid_clears() {
        let mut indicator = Indicator::new(
            CountingWriter {
                writes: 0,
                last: None,
            },
            16,
        );
        indicator.set(SignalColor::Blue).unwrap();
        let result = indicator.apply_raw(9);
        assert_eq!(result, Err(ApplyError::InvalidCode(StateCodeError(9))));
        assert_eq!(indicator.state(), IndicatorState::Off);
        assert_eq!(indicator.writer().last, Some(RGB8::default()));
    }
}
