//! Signal Core - Platform-agnostic Logic and Traits
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Sie definiert Traits, Zustandsautomaten und die Kommando-Dekodierung.

#![no_std]

pub mod board;
pub mod command;
pub mod dispatcher;
pub mod indicator;
pub mod signal_task;
pub mod traits;
pub mod types;
pub mod wake;

// Re-exports für einfachen Zugriff
pub use board::{BoardError, MAX_SIGNAL_TASKS, Outcome, Outcomes, SignalBoard};
pub use command::{
    ButtonBinding, Command, CommandToken, DEFAULT_BUTTONS, DEFAULT_COMMANDS, Decoded, Decodes,
    LineDecoder, MAX_TOKEN_LEN, TokenBuffer,
};
pub use dispatcher::{Dispatch, Dispatches, IgnoreReason, InputDispatcher};
pub use indicator::{ApplyError, Indicator, IndicatorArbiter};
pub use signal_task::{
    DEFAULT_ROSTER, DEFAULT_RUN_TICKS, DEFAULT_TICK, SignalSpec, SignalTask, TaskStep, WakeOutcome,
};
pub use traits::{Clock, LedError, SmartLedWriter};
pub use types::{DEFAULT_BRIGHTNESS, Edge, IndicatorState, InputEvent, SignalColor, StateCodeError};
pub use wake::WakeSlot;
