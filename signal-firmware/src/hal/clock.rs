// Monotone Uhr auf Basis von embassy-time
//
// signal-core rechnet mit core::time::Duration seit Systemstart,
// embassy-time mit Instant. Hier wird zwischen beiden umgerechnet.

use embassy_time::Instant;
use signal_core::Clock;

/// Zeit seit Boot aus dem embassy Time-Driver
#[derive(Clone, Copy, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn elapsed(&self) -> core::time::Duration {
        core::time::Duration::from_micros(Instant::now().as_micros())
    }
}

/// Rechnet eine Deadline aus signal-core in einen embassy Instant um
pub fn instant_at(since_boot: core::time::Duration) -> Instant {
    Instant::from_micros(since_boot.as_micros() as u64)
}
