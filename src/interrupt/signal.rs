/*!
 * Interrupt Condition
 * Marker condition delivered asynchronously into a target thread
 */

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Asynchronous interruption condition for a worker thread.
///
/// A worker may match on an observed `Interrupt` to respond gracefully, such
/// as performing any necessary cleanup before unwinding out of its work loop.
///
/// This is deliberately *not* an `std::error::Error` and has no conversion
/// into [`InterruptError`](crate::core::errors::InterruptError), so catch-all
/// error handling cannot swallow it unintentionally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interrupt {
    kind: Cow<'static, str>,
}

impl Interrupt {
    /// Create an interrupt with a custom condition kind
    pub fn new(kind: impl Into<Cow<'static, str>>) -> Self {
        Self { kind: kind.into() }
    }

    /// Worker shutdown notification
    pub fn shutdown() -> Self {
        Self::new("Shutdown")
    }

    /// Work item exceeded its configured time limit
    pub fn time_limit_exceeded() -> Self {
        Self::new("TimeLimitExceeded")
    }

    /// Condition kind name, used in logs and observer matching
    pub fn kind(&self) -> &str {
        &self.kind
    }
}

impl fmt::Display for Interrupt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Interrupt({})", self.kind)
    }
}
