/*!
 * Thread Interrupt Library
 * Cross-thread, best-effort cancellation for worker threads
 *
 * A controller interrupts a specific running thread by staging an
 * asynchronous condition that the target observes at its next checkpoint,
 * combined with an optional OS wake signal that breaks the target out of
 * blocking system calls.
 */

pub mod core;
pub mod interrupt;
pub mod syscall;

// Re-exports
pub use crate::core::errors::{InterruptError, InterruptResult};
pub use crate::core::platform::{Platform, RuntimeFamily};
pub use crate::core::types::{DeliveryCount, ThreadId};
pub use interrupt::{
    checkpoint, inject, Interrupt, InterruptController, InterruptStats, ThreadGuard,
    ThreadRegistry,
};
