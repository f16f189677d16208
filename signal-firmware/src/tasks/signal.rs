// Signal Task - ein Embassy Task pro Farbe im Roster
use defmt::{info, warn};
use embassy_time::Timer;
use signal_core::{Clock, SignalSpec, SignalTask, SmartLedWriter, TaskStep};

use crate::hal::{EmbassyClock, instant_at};
use crate::{RmtIndicator, SharedIndicator, SharedWakeSlot};

/// Signal Logic - Testbare Ablauf-Logik ohne Hardware-Abhängigkeit
///
/// Ablauf pro Weckruf:
/// - Wartet (Dormant) bis der Dispatcher den Slot weckt
/// - Behauptet an jeder Tick-Grenze die eigene Farbe beim Arbiter
/// - Gibt die LED nach `run_ticks` Ticks genau einmal frei
/// - Verwirft Weckrufe, die während des Laufs eingetroffen sind
///
/// Zwischen den Tick-Grenzen schläft der Task (`Timer::at`),
/// andere Tasks laufen weiter.
///
/// # Fehlerbehandlung
/// Ein Schreibfehler auf der LED ist fatal (Panic → esp-backtrace).
pub async fn signal_logic<W: SmartLedWriter, C: Clock>(
    spec: SignalSpec,
    slot: &SharedWakeSlot,
    indicator: &SharedIndicator<W>,
    clock: &C,
) -> ! {
    let color = spec.color;
    let mut task = SignalTask::new(spec);
    info!("Signal: {} task dormant (priority {})", color, spec.priority);

    loop {
        slot.wait().await;
        task.wake(clock.elapsed());
        info!("Signal: beginning {} run", color);

        while let Some(deadline) = task.next_deadline() {
            Timer::at(instant_at(deadline)).await;

            while let Some(step) = task.poll(clock.elapsed()) {
                let mut arbiter = indicator.lock().await;
                match step {
                    TaskStep::Assert { tick } => {
                        let shown = arbiter
                            .assert(color, spec.priority)
                            .unwrap_or_else(|e| defmt::panic!("Signal: {} assert failed: {}", color, e));
                        if tick > 0 {
                            info!("Signal: {} task {} second(s), showing {}", color, tick, shown);
                        }
                    }
                    TaskStep::Release => {
                        let shown = arbiter
                            .release(color)
                            .unwrap_or_else(|e| defmt::panic!("Signal: {} release failed: {}", color, e));
                        info!("Signal: ending {} run, showing {}", color, shown);
                    }
                }
            }
        }

        if slot.finish() {
            warn!("Signal: dropped wake for {} received while active", color);
        }
    }
}

/// Signal Task - Embassy Task für parallele Ausführung
///
/// **Task Pool:** Ein Task pro Roster-Eintrag, alle teilen sich
/// denselben Indikator.
///
/// # Parameter
/// - `spec`: Farbe, Priorität und Laufzeit
/// - `slot`: Weckruf-Slot dieser Farbe
/// - `indicator`: gemeinsamer Arbiter für die LED
#[embassy_executor::task(pool_size = 4)]
pub async fn signal_task(
    spec: SignalSpec,
    slot: &'static SharedWakeSlot,
    indicator: &'static RmtIndicator,
) {
    signal_logic(spec, slot, indicator, &EmbassyClock).await
}
