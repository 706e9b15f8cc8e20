/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Interrupt operation result
pub type InterruptResult<T> = Result<T, InterruptError>;

/// Errors raised by the interrupt subsystem's internal plumbing.
///
/// The public operations never propagate these for platform or thread-matching
/// issues: those paths degrade and log at critical severity instead. This type
/// surfaces through logs and through the lower-level signal-delivery calls.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum InterruptError {
    #[error("Thread interruption is not supported on platform {0}")]
    #[diagnostic(
        code(interrupt::unsupported_platform),
        help("Pending-condition injection requires a native threading platform.")
    )]
    UnsupportedPlatform(String),

    #[error("Wake signal {0} is not defined on this host")]
    #[diagnostic(
        code(interrupt::signal_unavailable),
        help("Set INTERRUPT_WAKE_SIGNAL to a signal name the host OS defines, e.g. SIGUSR1.")
    )]
    SignalUnavailable(String),

    #[error("Failed to deliver wake signal: {0}")]
    #[diagnostic(
        code(interrupt::signal_delivery),
        help("The OS rejected the signal. Check process signal configuration.")
    )]
    SignalDelivery(String),
}
