/*!
 * System-Call Interruption
 * Process-wide wake-signal support for breaking blocked system calls
 */

mod controller;

// Re-export public API
pub use controller::{disable, enable, is_armed, WAKE_SIGNAL_ENV};

#[cfg(unix)]
pub use controller::deliver_wake_signal;
