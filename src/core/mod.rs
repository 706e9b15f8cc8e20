/*!
 * Core Module
 * Shared types, errors, and platform capabilities
 */

pub mod errors;
pub mod platform;
pub mod types;

pub use errors::{InterruptError, InterruptResult};
pub use platform::{Platform, RuntimeFamily};
pub use types::{DeliveryCount, ThreadId};
