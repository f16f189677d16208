//! Signal-Task Zustandsautomat
//!
//! Ein Signal-Task ruht (Dormant), bis er geweckt wird, behauptet dann
//! für eine feste Anzahl Ticks seine Farbe und gibt die LED anschließend
//! genau einmal wieder frei. Der Automat kennt keine Uhr und keinen
//! Executor: der Aufrufer übergibt die aktuelle Zeit und schläft selbst
//! bis zur nächsten Deadline.

use core::time::Duration;

use crate::types::SignalColor;

/// Standard-Tick: eine Sekunde
pub const DEFAULT_TICK: Duration = Duration::from_secs(1);

/// Standard-Laufzeit in Ticks
pub const DEFAULT_RUN_TICKS: u8 = 3;

/// Standard-Roster: Rot > Gelb > Grün
pub const DEFAULT_ROSTER: [SignalSpec; 3] = [
    SignalSpec::new(SignalColor::Red, 3, DEFAULT_RUN_TICKS, DEFAULT_TICK),
    SignalSpec::new(SignalColor::Yellow, 2, DEFAULT_RUN_TICKS, DEFAULT_TICK),
    SignalSpec::new(SignalColor::Green, 1, DEFAULT_RUN_TICKS, DEFAULT_TICK),
];

/// Unveränderliche Konfiguration eines Signal-Tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalSpec {
    pub color: SignalColor,
    /// Höhere Zahl gewinnt die LED
    pub priority: u8,
    pub run_ticks: u8,
    pub tick: Duration,
}

impl SignalSpec {
    pub const fn new(color: SignalColor, priority: u8, run_ticks: u8, tick: Duration) -> Self {
        Self {
            color,
            priority,
            run_ticks,
            tick,
        }
    }

    /// Gesamte aktive Laufzeit
    ///
    /// ```
    /// # use core::time::Duration;
    /// # use signal_core::DEFAULT_ROSTER;
    /// assert_eq!(DEFAULT_ROSTER[0].run_duration(), Duration::from_secs(3));
    /// ```
    pub fn run_duration(&self) -> Duration {
        self.tick * u32::from(self.run_ticks)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Dormant,
    Active { woken_at: Duration, next_tick: u8 },
}

/// Ergebnis eines Weckrufs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeOutcome {
    /// Dormant → Active
    Started,
    /// Task lief bereits, Weckruf ohne Wirkung
    AlreadyActive,
}

/// Fälliger Schritt eines aktiven Tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStep {
    /// Tick-Grenze erreicht: Farbe erneut behaupten (0-basiert)
    Assert { tick: u8 },
    /// Laufzeit abgelaufen: LED freigeben, Task ist wieder Dormant
    Release,
}

/// Ein Signal-Task
#[derive(Debug, Clone)]
pub struct SignalTask {
    spec: SignalSpec,
    lifecycle: Lifecycle,
}

impl SignalTask {
    /// Neuer Task im Zustand Dormant
    pub fn new(spec: SignalSpec) -> Self {
        Self {
            spec,
            lifecycle: Lifecycle::Dormant,
        }
    }

    pub fn spec(&self) -> &SignalSpec {
        &self.spec
    }

    pub fn color(&self) -> SignalColor {
        self.spec.color
    }

    pub fn is_active(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Active { .. })
    }

    /// Weckt den Task
    ///
    /// Ein bereits aktiver Task wird nicht neu gestartet: Tick-Zähler und
    /// Endzeit bleiben unverändert.
    pub fn wake(&mut self, now: Duration) -> WakeOutcome {
        match self.lifecycle {
            Lifecycle::Active { .. } => WakeOutcome::AlreadyActive,
            Lifecycle::Dormant => {
                self.lifecycle = Lifecycle::Active {
                    woken_at: now,
                    next_tick: 0,
                };
                WakeOutcome::Started
            }
        }
    }

    /// Liefert den nächsten fälligen Schritt oder `None`
    ///
    /// Der Aufrufer ruft `poll` so lange auf, bis `None` kommt. Liegen
    /// mehrere Tick-Grenzen in der Vergangenheit, werden sie nacheinander
    /// geliefert.
    pub fn poll(&mut self, now: Duration) -> Option<TaskStep> {
        let Lifecycle::Active {
            woken_at,
            next_tick,
        } = &mut self.lifecycle
        else {
            return None;
        };

        let boundary = *woken_at + self.spec.tick * u32::from(*next_tick);
        if now < boundary {
            return None;
        }

        if *next_tick < self.spec.run_ticks {
            let tick = *next_tick;
            *next_tick += 1;
            Some(TaskStep::Assert { tick })
        } else {
            self.lifecycle = Lifecycle::Dormant;
            Some(TaskStep::Release)
        }
    }

    /// Zeitpunkt des nächsten Schritts (nur wenn aktiv)
    pub fn next_deadline(&self) -> Option<Duration> {
        match self.lifecycle {
            Lifecycle::Dormant => None,
            Lifecycle::Active {
                woken_at,
                next_tick,
            } => Some(woken_at + self.spec.tick * u32::from(next_tick)),
        }
    }

    /// Ende der laufenden Aktivphase (nur wenn aktiv)
    pub fn ends_at(&self) -> Option<Duration> {
        match self.lifecycle {
            Lifecycle::Dormant => None,
            Lifecycle::Active { woken_at, .. } => Some(woken_at + self.spec.run_duration()),
        }
    }

    /// Anzahl bereits behaupteter Ticks der laufenden Aktivphase
    pub fn ticks_done(&self) -> u8 {
        match self.lifecycle {
            Lifecycle::Dormant => 0,
            Lifecycle::Active { next_tick, .. } => next_tick,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for WakeOutcome {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            WakeOutcome::Started => defmt::write!(fmt, "Started"),
            WakeOutcome::AlreadyActive => defmt::write!(fmt, "AlreadyActive"),
        }
    }
}
