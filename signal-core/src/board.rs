//! Supervisor-Modell
//!
//! `SignalBoard` bündelt Roster, Dispatcher und Arbiter in einer
//! deterministischen Einheit. Die Zeit kommt von außen, dadurch lassen
//! sich alle Abläufe ohne Executor auf dem Host prüfen.

use core::time::Duration;

use heapless::Vec;

use crate::command::{ButtonBinding, CommandToken, DEFAULT_BUTTONS, DEFAULT_COMMANDS, TokenBuffer};
use crate::dispatcher::{Dispatch, IgnoreReason, InputDispatcher};
use crate::indicator::{Indicator, IndicatorArbiter};
use crate::signal_task::{DEFAULT_ROSTER, SignalSpec, SignalTask, TaskStep, WakeOutcome};
use crate::traits::{LedError, SmartLedWriter};
use crate::types::{DEFAULT_BRIGHTNESS, IndicatorState, InputEvent, SignalColor};

/// Höchstens ein Task pro Farbe
pub const MAX_SIGNAL_TASKS: usize = SignalColor::ALL.len();

/// Fehler beim Aufbau oder Betrieb des Boards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    /// Zwei Roster-Einträge mit derselben Farbe
    DuplicateColor(SignalColor),
    /// Mehr Roster-Einträge als Farben
    RosterFull,
    Led(LedError),
}

impl From<LedError> for BoardError {
    fn from(e: LedError) -> Self {
        BoardError::Led(e)
    }
}

/// Was ein Event auf dem Board bewirkt hat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Woke {
        color: SignalColor,
        outcome: WakeOutcome,
    },
    /// Farbe bekannt, aber kein Task im Roster
    NoSuchTask(SignalColor),
    ToggleFollower,
    Ignored(IgnoreReason),
    Unrecognized(TokenBuffer),
}

/// Wirkungen eines Events, leer solange ein Token unvollständig ist
pub type Outcomes = Vec<Outcome, 2>;

/// Signal-Tasks, Dispatcher und Indikator als eine Einheit
pub struct SignalBoard<'a, W: SmartLedWriter> {
    arbiter: IndicatorArbiter<W>,
    tasks: Vec<SignalTask, MAX_SIGNAL_TASKS>,
    dispatcher: InputDispatcher<'a>,
}

impl<W: SmartLedWriter> SignalBoard<'static, W> {
    /// Board mit Standard-Roster, Standard-Tokens und Standard-Tastern
    pub fn with_defaults(writer: W) -> Result<Self, BoardError> {
        SignalBoard::new(
            writer,
            DEFAULT_BRIGHTNESS,
            &DEFAULT_ROSTER,
            &DEFAULT_COMMANDS,
            &DEFAULT_BUTTONS,
        )
    }
}

impl<'a, W: SmartLedWriter> SignalBoard<'a, W> {
    /// Erstellt alle Tasks im Zustand Dormant und schaltet die LED aus
    pub fn new(
        writer: W,
        brightness: u8,
        roster: &[SignalSpec],
        commands: &'a [CommandToken],
        buttons: &'a [ButtonBinding],
    ) -> Result<Self, BoardError> {
        let mut tasks: Vec<SignalTask, MAX_SIGNAL_TASKS> = Vec::new();
        for spec in roster {
            if tasks.iter().any(|t| t.color() == spec.color) {
                return Err(BoardError::DuplicateColor(spec.color));
            }
            tasks
                .push(SignalTask::new(*spec))
                .map_err(|_| BoardError::RosterFull)?;
        }

        let mut arbiter = IndicatorArbiter::new(Indicator::new(writer, brightness));
        arbiter.reset()?;

        Ok(Self {
            arbiter,
            tasks,
            dispatcher: InputDispatcher::new(commands, buttons),
        })
    }

    /// Verarbeitet ein Eingabe-Event und wendet fällige Schritte an
    pub fn handle(&mut self, event: InputEvent, now: Duration) -> Result<Outcomes, LedError> {
        let outcomes: Outcomes = self
            .dispatcher
            .handle(event)
            .into_iter()
            .map(|dispatch| self.apply(dispatch, now))
            .collect();
        self.advance(now)?;
        Ok(outcomes)
    }

    /// Housekeeping ohne Eingabe: angefangene Tokens verwerfen, Zeit fortschreiben
    pub fn idle(&mut self, now: Duration) -> Result<Option<Outcome>, LedError> {
        let outcome = self.dispatcher.on_idle().map(|d| self.apply(d, now));
        self.advance(now)?;
        Ok(outcome)
    }

    /// Wendet alle bis `now` fälligen Task-Schritte in zeitlicher Reihenfolge an
    pub fn advance(&mut self, now: Duration) -> Result<IndicatorState, LedError> {
        while let Some(index) = self.earliest_due(now) {
            let task = &mut self.tasks[index];
            let color = task.color();
            let priority = task.spec().priority;
            match task.poll(now) {
                Some(TaskStep::Assert { .. }) => {
                    self.arbiter.assert(color, priority)?;
                }
                Some(TaskStep::Release) => {
                    self.arbiter.release(color)?;
                }
                None => break,
            }
        }
        Ok(self.arbiter.state())
    }

    /// Nächster Zeitpunkt, zu dem `advance` etwas zu tun hat
    pub fn next_deadline(&self) -> Option<Duration> {
        self.tasks.iter().filter_map(SignalTask::next_deadline).min()
    }

    pub fn indicator_state(&self) -> IndicatorState {
        self.arbiter.state()
    }

    pub fn is_active(&self, color: SignalColor) -> bool {
        self.task(color).is_some_and(SignalTask::is_active)
    }

    /// Kein Task aktiv
    pub fn is_idle(&self) -> bool {
        self.tasks.iter().all(|t| !t.is_active())
    }

    pub fn task(&self, color: SignalColor) -> Option<&SignalTask> {
        self.tasks.iter().find(|t| t.color() == color)
    }

    pub fn arbiter(&self) -> &IndicatorArbiter<W> {
        &self.arbiter
    }

    pub fn arbiter_mut(&mut self) -> &mut IndicatorArbiter<W> {
        &mut self.arbiter
    }

    pub fn writer(&self) -> &W {
        self.arbiter.indicator().writer()
    }

    fn apply(&mut self, dispatch: Dispatch, now: Duration) -> Outcome {
        match dispatch {
            Dispatch::Wake(color) => match self.tasks.iter_mut().find(|t| t.color() == color) {
                Some(task) => Outcome::Woke {
                    color,
                    outcome: task.wake(now),
                },
                None => Outcome::NoSuchTask(color),
            },
            Dispatch::ToggleFollower => Outcome::ToggleFollower,
            Dispatch::Ignored(reason) => Outcome::Ignored(reason),
            Dispatch::Unrecognized(bytes) => Outcome::Unrecognized(bytes),
        }
    }

    // Task mit der frühesten fälligen Deadline; bei Gleichstand der erste im Roster
    fn earliest_due(&self, now: Duration) -> Option<usize> {
        self.tasks
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.next_deadline().map(|d| (d, i)))
            .filter(|(d, _)| *d <= now)
            .min()
            .map(|(_, i)| i)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for BoardError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            BoardError::DuplicateColor(color) => defmt::write!(fmt, "duplicate color {}", color),
            BoardError::RosterFull => defmt::write!(fmt, "roster full"),
            BoardError::Led(e) => defmt::write!(fmt, "{}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rgb::RGB8;

    struct NullWriter;

    impl SmartLedWriter for NullWriter {
        fn write(&mut self, _color: RGB8) -> Result<(), LedError> {
            Ok(())
        }
    }

    #[test]
    fn test_duplicate_color_is_rejected() {
        let roster = [DEFAULT_ROSTER[0], DEFAULT_ROSTER[0]];
        let result = SignalBoard::new(NullWriter, 16, &roster, &DEFAULT_COMMANDS, &DEFAULT_BUTTONS);
        assert!(matches!(
            result,
            Err(BoardError::DuplicateColor(SignalColor::Red))
        ));
    }

    #[test]
    fn test_all_tasks_start_dormant() {
        let board = SignalBoard::with_defaults(NullWriter).unwrap();
        assert!(board.is_idle());
        assert_eq!(board.next_deadline(), None);
        assert_eq!(board.indicator_state(), IndicatorState::Off);
    }

    #[test]
    fn test_waking_color_without_task() {
        let mut board = SignalBoard::with_defaults(NullWriter).unwrap();
        let mut outcomes = Outcomes::new();
        for b in b"leader_blue_task" {
            outcomes = board
                .handle(InputEvent::Serial(*b), Duration::ZERO)
                .unwrap();
        }
        assert_eq!(outcomes, [Outcome::NoSuchTask(SignalColor::Blue)]);
        assert!(board.is_idle());
    }
}
