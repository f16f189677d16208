// Task-Modul: Enthält alle Embassy Tasks
//
// Jeder Task läuft asynchron und unabhängig.
// Tasks kommunizieren über Embassy Channels (Taster → Dispatcher),
// Weckruf-Slots (Dispatcher → Signal-Tasks) und den Indikator-Mutex.

pub mod buttons;
pub mod dispatch;
pub mod heartbeat;
pub mod signal;

// Re-export Tasks für einfachen Import
pub use buttons::button_task;
pub use dispatch::input_dispatch_task;
pub use heartbeat::heartbeat_task;
pub use signal::{signal_logic, signal_task};
