//! Weckruf-Slot für Signal-Tasks
//!
//! Kapazität 1 und zusammenfassend: mehrere Weckrufe vor dem Start ergeben
//! einen Lauf, Weckrufe während des Laufs verfallen und werden vermerkt.
//! Der Mutex-Typ ist generisch, damit der Slot auch auf dem Host läuft.

use core::sync::atomic::{AtomicBool, Ordering};

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;

use crate::signal_task::WakeOutcome;

pub struct WakeSlot<M: RawMutex> {
    signal: Signal<M, ()>,
    active: AtomicBool,
    dropped: AtomicBool,
}

impl<M: RawMutex> WakeSlot<M> {
    pub const fn new() -> Self {
        Self {
            signal: Signal::new(),
            active: AtomicBool::new(false),
            dropped: AtomicBool::new(false),
        }
    }

    /// Weckt den Task
    ///
    /// Ohne Wirkung, wenn er schon geweckt ist oder läuft. Im zweiten Fall
    /// wird der Weckruf als verworfen vermerkt.
    pub fn wake(&self) -> WakeOutcome {
        if self.active.load(Ordering::Acquire) {
            self.dropped.store(true, Ordering::Release);
            return WakeOutcome::AlreadyActive;
        }
        if self.signal.signaled() {
            return WakeOutcome::AlreadyActive;
        }
        self.signal.signal(());
        WakeOutcome::Started
    }

    /// Blockiert bis zum nächsten Weckruf (Dormant → Active)
    pub async fn wait(&self) {
        self.signal.wait().await;
        self.active.store(true, Ordering::Release);
    }

    /// Active → Dormant
    ///
    /// Liefert `true`, wenn während des Laufs ein Weckruf verworfen wurde.
    /// Ein Weckruf, der zwischen `wait` und dem Setzen von `active`
    /// eingetroffen ist, zählt ebenfalls als verworfen.
    pub fn finish(&self) -> bool {
        let raced = self.signal.signaled();
        self.signal.reset();
        self.active.store(false, Ordering::Release);
        self.dropped.swap(false, Ordering::AcqRel) || raced
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

impl<M: RawMutex> Default for WakeSlot<M> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;
    use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, NoopRawMutex};

    #[test]
    fn test_wakes_before_start_coalesce() {
        let slot = WakeSlot::<NoopRawMutex>::new();
        assert_eq!(slot.wake(), WakeOutcome::Started);
        assert_eq!(slot.wake(), WakeOutcome::AlreadyActive);

        block_on(slot.wait());
        assert!(slot.is_active());
        // Zusammengefasst, nicht verworfen
        assert!(!slot.finish());
    }

    #[test]
    fn test_wake_while_active_is_dropped() {
        let slot = WakeSlot::<NoopRawMutex>::new();
        slot.wake();
        block_on(slot.wait());

        assert_eq!(slot.wake(), WakeOutcome::AlreadyActive);
        assert!(slot.finish());
    }

    #[test]
    fn test_finish_resets_slot() {
        let slot = WakeSlot::<CriticalSectionRawMutex>::new();
        slot.wake();
        block_on(slot.wait());
        slot.wake();
        assert!(slot.finish());

        assert!(!slot.is_active());
        // Verworfener Weckruf startet keinen zweiten Lauf
        assert_eq!(slot.wake(), WakeOutcome::Started);
        block_on(slot.wait());
        assert!(!slot.finish());
    }
}
