/*!
 * Exception Injector
 * Stages pending conditions in target threads' slots
 */

use super::registry::ThreadRegistry;
use super::signal::Interrupt;
use crate::core::platform::Platform;
use crate::core::types::{DeliveryCount, ThreadId};
use log::error;

/// Stage `interrupt` for the thread identified by `thread_id`.
///
/// Returns the number of registry entries matched: 0 means the identifier was
/// stale or never existed, 1 is success, and more than one is an internal
/// consistency violation that is retracted on the spot. None of these
/// outcomes raise to the caller; degraded paths are logged at critical
/// severity.
///
/// The staged condition fires the next time the target polls
/// [`checkpoint`](super::checkpoint). A thread parked in a blocking system
/// call will not observe it until the call returns; see the wake-signal path
/// in [`InterruptController`](super::InterruptController).
pub fn inject(
    registry: &ThreadRegistry,
    thread_id: ThreadId,
    interrupt: Interrupt,
) -> DeliveryCount {
    let platform = Platform::current();
    if !platform.supports_injection() {
        error!(
            "Setting thread interrupts ({}) is not supported on platform {}",
            interrupt.kind(),
            platform.os
        );
        return 0;
    }

    let slots = registry.matching_slots(thread_id);
    match slots.len() {
        0 => {
            registry.stats.inc_missed_targets();
            error!(
                "Failed to set interrupt ({}) in thread {}",
                interrupt.kind(),
                thread_id
            );
            0
        }
        1 => {
            slots[0].stage(interrupt);
            registry.stats.inc_interrupts_staged();
            1
        }
        count => {
            // Registry invariant violated; retract before any target observes
            // a condition that was never meant for it
            error!(
                "Interrupt ({}) matched {} threads. Undoing...",
                interrupt.kind(),
                count
            );
            for slot in &slots {
                slot.clear();
            }
            count
        }
    }
}
