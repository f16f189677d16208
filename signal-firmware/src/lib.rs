// Library-Root: Wiederverwendbare Logik und Module
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

// Module
pub mod config;
pub mod hal;
pub mod tasks;

// Re-exports von signal-core
pub use signal_core::{
    Dispatch, IndicatorArbiter, InputEvent, LedError, SignalColor, SignalSpec, SmartLedWriter,
    WakeOutcome, WakeSlot,
};

// Embassy Sync-Typen
use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, NoopRawMutex};
use embassy_sync::channel::{Channel, Receiver, Sender};
use embassy_sync::mutex::Mutex;

use crate::config::BUTTON_QUEUE_DEPTH;
use crate::hal::RmtLedWriter;

// ============================================================================
// Weckruf für Signal-Tasks
// ============================================================================

/// Weckruf-Slot, der zwischen Dispatcher und Signal-Task geteilt wird
pub type SharedWakeSlot = WakeSlot<CriticalSectionRawMutex>;

/// Ein Slot pro Farbe, indiziert über `SignalColor as usize`
pub static WAKE_SLOTS: [SharedWakeSlot; SignalColor::ALL.len()] =
    [const { SharedWakeSlot::new() }; SignalColor::ALL.len()];

/// Slot einer Farbe
pub fn wake_slot(color: SignalColor) -> &'static SharedWakeSlot {
    &WAKE_SLOTS[color as usize]
}

// ============================================================================
// Type-Aliase für geteilte Ressourcen und Channels
// ============================================================================
//
// Diese Type-Aliase vereinfachen die Lesbarkeit der Funktionssignaturen.

/// Einziger Schreibzugang zur Indikator-LED, geschützt durch einen Mutex
pub type SharedIndicator<W> = Mutex<CriticalSectionRawMutex, IndicatorArbiter<W>>;

/// Indikator mit echter RMT-Hardware
pub type RmtIndicator = SharedIndicator<RmtLedWriter<'static>>;

/// Channel für Taster-Events (Taster-Tasks → Dispatcher)
/// - BUTTON_QUEUE_DEPTH: Events, die auf den Dispatcher warten
pub type InputEventChannel = Channel<NoopRawMutex, InputEvent, BUTTON_QUEUE_DEPTH>;

/// Sender für Taster-Events
pub type InputEventSender = Sender<'static, NoopRawMutex, InputEvent, BUTTON_QUEUE_DEPTH>;

/// Receiver für Taster-Events (Dispatcher empfängt)
pub type InputEventReceiver = Receiver<'static, NoopRawMutex, InputEvent, BUTTON_QUEUE_DEPTH>;
