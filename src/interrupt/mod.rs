/*!
 * Interrupt Module
 * Pending-condition injection for registered worker threads
 */

mod controller;
mod injector;
mod registry;
mod signal;

// Re-export public API
pub use controller::InterruptController;
pub use injector::inject;
pub use registry::{checkpoint, InterruptStats, ThreadGuard, ThreadRegistry};
pub use signal::Interrupt;
