/*!
 * Thread Registry
 * Tracks registered worker threads and their pending-interrupt slots
 */

use super::signal::Interrupt;
use crate::core::types::ThreadId;
use ahash::RandomState;
use dashmap::DashMap;
use log::debug;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[cfg(unix)]
use nix::sys::pthread::{pthread_self, Pthread};

/// Pending-interrupt slot shared between the registry and its owner thread.
///
/// Staging is a single guarded store: the target never observes an
/// intermediate state.
pub(crate) struct PendingSlot(Mutex<Option<Interrupt>>);

impl PendingSlot {
    fn new() -> Self {
        Self(Mutex::new(None))
    }

    /// Stage a condition for delivery at the owner's next checkpoint
    pub(crate) fn stage(&self, interrupt: Interrupt) {
        *self.0.lock() = Some(interrupt);
    }

    /// Corrective retraction: re-associate the slot with no pending condition
    pub(crate) fn clear(&self) {
        *self.0.lock() = None;
    }

    fn take(&self) -> Option<Interrupt> {
        self.0.lock().take()
    }
}

pub(crate) struct ThreadEntry {
    id: ThreadId,
    slot: Arc<PendingSlot>,
    #[cfg(unix)]
    pthread: Pthread,
}

/// Snapshot of interrupt statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterruptStats {
    pub registered_threads: usize,
    pub interrupts_staged: u64,
    pub missed_targets: u64,
    pub wake_signals_sent: u64,
}

/// Atomic interrupt statistics for lock-free updates
///
/// # Performance
/// - Cache-line aligned to prevent false sharing
/// - All operations use relaxed ordering
#[repr(C, align(64))]
pub(crate) struct AtomicInterruptStats {
    interrupts_staged: AtomicU64,
    missed_targets: AtomicU64,
    wake_signals_sent: AtomicU64,
}

impl AtomicInterruptStats {
    const fn new() -> Self {
        Self {
            interrupts_staged: AtomicU64::new(0),
            missed_targets: AtomicU64::new(0),
            wake_signals_sent: AtomicU64::new(0),
        }
    }

    #[inline(always)]
    pub(crate) fn inc_interrupts_staged(&self) {
        self.interrupts_staged.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub(crate) fn inc_missed_targets(&self) {
        self.missed_targets.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub(crate) fn inc_wake_signals_sent(&self) {
        self.wake_signals_sent.fetch_add(1, Ordering::Relaxed);
    }
}

thread_local! {
    static CURRENT_SLOT: RefCell<Option<Arc<PendingSlot>>> = const { RefCell::new(None) };
}

/// Registry of worker threads eligible for interruption.
///
/// The crate's stand-in for a managed runtime's thread table: workers register
/// themselves on startup and poll [`checkpoint`] at interruptible points.
pub struct ThreadRegistry {
    threads: DashMap<ThreadId, ThreadEntry, RandomState>,
    next_id: AtomicU64,
    pub(crate) stats: AtomicInterruptStats,
}

impl ThreadRegistry {
    pub fn new() -> Self {
        Self {
            threads: DashMap::with_hasher(RandomState::new()),
            next_id: AtomicU64::new(1),
            stats: AtomicInterruptStats::new(),
        }
    }

    /// Register the calling thread for interruption.
    ///
    /// Must be called from the worker thread itself so the pending slot and,
    /// on Unix, the raw pthread handle belong to that thread. The returned
    /// guard deregisters on drop; register a thread at most once at a time.
    pub fn register_current(self: &Arc<Self>) -> ThreadGuard {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let slot = Arc::new(PendingSlot::new());

        CURRENT_SLOT.with(|cell| *cell.borrow_mut() = Some(slot.clone()));
        self.threads.insert(
            id,
            ThreadEntry {
                id,
                slot,
                #[cfg(unix)]
                pthread: pthread_self(),
            },
        );

        debug!("Registered thread {} for interruption", id);
        ThreadGuard {
            registry: Arc::clone(self),
            id,
        }
    }

    /// Collect pending slots for every entry matching the identifier.
    ///
    /// A keyed lookup can only ever yield one entry; the scan compares the
    /// identifier stored inside each entry so the multiple-match invariant
    /// stays checkable instead of assumed.
    pub(crate) fn matching_slots(&self, id: ThreadId) -> Vec<Arc<PendingSlot>> {
        self.threads
            .iter()
            .filter(|entry| entry.id == id)
            .map(|entry| Arc::clone(&entry.slot))
            .collect()
    }

    /// Raw pthread handle for the wake-signal path
    #[cfg(unix)]
    pub(crate) fn pthread_of(&self, id: ThreadId) -> Option<Pthread> {
        self.threads.get(&id).map(|entry| entry.pthread)
    }

    /// Number of currently registered threads
    pub fn len(&self) -> usize {
        self.threads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }

    /// Snapshot interrupt statistics
    pub fn stats(&self) -> InterruptStats {
        InterruptStats {
            registered_threads: self.threads.len(),
            interrupts_staged: self.stats.interrupts_staged.load(Ordering::Relaxed),
            missed_targets: self.stats.missed_targets.load(Ordering::Relaxed),
            wake_signals_sent: self.stats.wake_signals_sent.load(Ordering::Relaxed),
        }
    }
}

impl Default for ThreadRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII registration for the current thread.
///
/// Must be dropped on the thread that registered, since deregistration also
/// clears that thread's local slot reference.
pub struct ThreadGuard {
    registry: Arc<ThreadRegistry>,
    id: ThreadId,
}

impl ThreadGuard {
    /// Identifier handed to controllers that may interrupt this thread
    pub fn id(&self) -> ThreadId {
        self.id
    }
}

impl Drop for ThreadGuard {
    fn drop(&mut self) {
        CURRENT_SLOT.with(|cell| cell.borrow_mut().take());
        self.registry.threads.remove(&self.id);
        debug!("Deregistered thread {}", self.id);
    }
}

/// Poll for a pending interrupt on the calling thread.
///
/// Worker loops call this at safely-interruptible points. A staged condition
/// is taken exactly once and returned as `Err` so it unwinds the work loop
/// through the usual `?` path. Threads that never registered always get
/// `Ok(())`.
pub fn checkpoint() -> Result<(), Interrupt> {
    let pending = CURRENT_SLOT.with(|cell| cell.borrow().as_ref().and_then(|slot| slot.take()));
    match pending {
        Some(interrupt) => Err(interrupt),
        None => Ok(()),
    }
}
