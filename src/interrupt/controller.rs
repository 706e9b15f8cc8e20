/*!
 * Interrupt Controller
 * Composes pending-condition injection with the system-call wake path
 */

use super::injector::inject;
use super::registry::{InterruptStats, ThreadGuard, ThreadRegistry};
use super::signal::Interrupt;
use crate::core::types::ThreadId;
use crate::syscall;
use log::info;
use std::sync::Arc;

#[cfg(unix)]
use log::{debug, warn};

/// Entry point for collaborators that interrupt worker threads.
///
/// Owns the thread registry; worker threads register through it and
/// supervisors direct interrupts at registered identifiers. Cloning shares
/// the underlying registry.
#[derive(Clone)]
pub struct InterruptController {
    registry: Arc<ThreadRegistry>,
}

impl InterruptController {
    pub fn new() -> Self {
        info!("Interrupt controller initialized");
        Self {
            registry: Arc::new(ThreadRegistry::new()),
        }
    }

    /// Register the calling worker thread; the guard deregisters on drop
    pub fn register_current_thread(&self) -> ThreadGuard {
        self.registry.register_current()
    }

    /// Shared registry, for collaborators that drive [`inject`] directly
    pub fn registry(&self) -> Arc<ThreadRegistry> {
        Arc::clone(&self.registry)
    }

    /// Interrupt thread `thread_id` with `interrupt`.
    ///
    /// The condition is staged before any wake signal is sent so that it is
    /// already pending when a blocked system call returns early; otherwise
    /// the target could resume the call, complete it normally, and not
    /// observe the interrupt until some later checkpoint.
    ///
    /// Returns whether the injection matched exactly one live thread. The
    /// wake signal is best-effort and never changes the result.
    pub fn request_interrupt(&self, thread_id: ThreadId, interrupt: Interrupt) -> bool {
        let kind = interrupt.kind().to_owned();
        let count = inject(&self.registry, thread_id, interrupt);
        if count == 1 && syscall::is_armed() {
            self.wake(thread_id, &kind);
        }
        count == 1
    }

    /// Toggle system-call interruption support process-wide.
    ///
    /// Idempotent in both directions. Callers must serialize toggling; see
    /// [`syscall::enable`].
    pub fn set_system_call_interruption(&self, enabled: bool) {
        if enabled {
            syscall::enable();
        } else {
            syscall::disable();
        }
    }

    /// Snapshot interrupt statistics
    pub fn stats(&self) -> InterruptStats {
        self.registry.stats()
    }

    #[cfg(unix)]
    fn wake(&self, thread_id: ThreadId, kind: &str) {
        // The target exiting between injection and wake-up is an expected
        // race; a vanished entry is simply skipped
        let Some(pthread) = self.registry.pthread_of(thread_id) else {
            return;
        };
        match syscall::deliver_wake_signal(pthread) {
            Ok(()) => {
                self.registry.stats.inc_wake_signals_sent();
                debug!(
                    "Wake signal sent to thread {} for interrupt ({})",
                    thread_id, kind
                );
            }
            Err(e) => warn!("Wake signal for thread {} failed: {}", thread_id, e),
        }
    }

    #[cfg(not(unix))]
    fn wake(&self, _thread_id: ThreadId, _kind: &str) {}
}

impl Default for InterruptController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interrupt::checkpoint;

    #[test]
    fn test_request_interrupt_current_thread() {
        let controller = InterruptController::new();
        let guard = controller.register_current_thread();

        assert!(controller.request_interrupt(guard.id(), Interrupt::shutdown()));
        assert_eq!(checkpoint(), Err(Interrupt::shutdown()));
    }

    #[test]
    fn test_request_interrupt_unknown_thread() {
        let controller = InterruptController::new();
        assert!(!controller.request_interrupt(42, Interrupt::shutdown()));
        assert_eq!(controller.stats().missed_targets, 1);
    }

    #[test]
    fn test_clone_shares_registry() {
        let controller = InterruptController::new();
        let other = controller.clone();
        let guard = controller.register_current_thread();

        assert!(other.request_interrupt(guard.id(), Interrupt::time_limit_exceeded()));
        assert_eq!(checkpoint(), Err(Interrupt::time_limit_exceeded()));
    }
}
