/*!
 * System-Call Interrupt Controller
 * Arms a no-op wake signal so blocked system calls return early
 *
 * Injection alone is invisible to a thread parked in kernel-level I/O. While
 * armed, delivering the wake signal to such a thread makes the blocked call
 * fail with EINTR, after which the already-staged condition fires at the
 * thread's next checkpoint.
 */

use log::warn;
use std::sync::atomic::{AtomicBool, Ordering};

#[cfg(unix)]
use crate::core::errors::{InterruptError, InterruptResult};
#[cfg(unix)]
use log::info;
#[cfg(unix)]
use nix::errno::Errno;
#[cfg(unix)]
use nix::libc::c_int;
#[cfg(unix)]
use nix::sys::pthread::{pthread_kill, Pthread};
#[cfg(unix)]
use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};
#[cfg(unix)]
use std::sync::OnceLock;

/// Environment variable naming the wake signal (default SIGUSR1)
pub const WAKE_SIGNAL_ENV: &str = "INTERRUPT_WAKE_SIGNAL";

#[cfg(unix)]
const DEFAULT_WAKE_SIGNAL: &str = "SIGUSR1";

static ARMED: AtomicBool = AtomicBool::new(false);

#[cfg(unix)]
static WAKE_SIGNAL: OnceLock<(String, Option<Signal>)> = OnceLock::new();

/// Resolve the configured wake signal once.
///
/// A name the host OS does not define leaves the feature unavailable; this is
/// capability probing, not a hard failure.
#[cfg(unix)]
fn wake_signal() -> &'static (String, Option<Signal>) {
    WAKE_SIGNAL.get_or_init(|| {
        let name =
            std::env::var(WAKE_SIGNAL_ENV).unwrap_or_else(|_| DEFAULT_WAKE_SIGNAL.to_string());
        match name.parse::<Signal>() {
            Ok(sig) => (name, Some(sig)),
            Err(_) => {
                warn!(
                    "Wake signal {} is not defined on this host; system-call interruption unavailable",
                    name
                );
                (name, None)
            }
        }
    })
}

/// Wake handler: the sole effect is returning control to user code so the
/// interrupted system call fails with EINTR. Must stay async-signal-safe, so
/// no allocation, locks, or logging here.
#[cfg(unix)]
extern "C" fn wake_handler(_signum: c_int) {}

/// Arm the wake signal. Idempotent.
///
/// Installs the no-op handler with `SA_RESTART` deliberately omitted: the
/// kernel must let the signal interrupt blocking system calls rather than
/// transparently restarting them.
///
/// Arming mutates process-wide signal dispositions; callers must serialize
/// `enable`/`disable` through a single coordinating context.
#[cfg(unix)]
pub fn enable() {
    if ARMED.load(Ordering::SeqCst) {
        return;
    }
    let (name, Some(sig)) = wake_signal() else {
        return;
    };

    let action = SigAction::new(
        SigHandler::Handler(wake_handler),
        SaFlags::empty(),
        SigSet::empty(),
    );
    match unsafe { sigaction(*sig, &action) } {
        Ok(_) => {
            ARMED.store(true, Ordering::SeqCst);
            info!("System-call interruption armed with {}", name);
        }
        Err(e) => warn!("Failed to arm wake signal {}: {}", name, e),
    }
}

#[cfg(not(unix))]
pub fn enable() {
    warn!("System-call interruption is not supported on this platform");
}

/// Restore the wake signal's default disposition. Idempotent.
#[cfg(unix)]
pub fn disable() {
    if !ARMED.load(Ordering::SeqCst) {
        return;
    }
    let (name, Some(sig)) = wake_signal() else {
        return;
    };

    let action = SigAction::new(SigHandler::SigDfl, SaFlags::empty(), SigSet::empty());
    match unsafe { sigaction(*sig, &action) } {
        Ok(_) => {
            ARMED.store(false, Ordering::SeqCst);
            info!("System-call interruption disarmed");
        }
        Err(e) => warn!("Failed to disarm wake signal {}: {}", name, e),
    }
}

#[cfg(not(unix))]
pub fn disable() {}

/// Whether the wake signal is currently armed
pub fn is_armed() -> bool {
    ARMED.load(Ordering::SeqCst)
}

/// Send the wake signal to a specific thread.
///
/// A target that exited between injection and wake-up surfaces as `ESRCH`;
/// that race is expected and swallowed.
#[cfg(unix)]
pub fn deliver_wake_signal(target: Pthread) -> InterruptResult<()> {
    let (name, sig) = wake_signal();
    let Some(sig) = sig else {
        return Err(InterruptError::SignalUnavailable(name.clone()));
    };

    match pthread_kill(target, *sig) {
        Ok(()) => Ok(()),
        Err(Errno::ESRCH) => Ok(()),
        Err(e) => Err(InterruptError::SignalDelivery(e.to_string())),
    }
}
