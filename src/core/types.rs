/*!
 * Core Types
 * Common types used across the interrupt subsystem
 */

/// Opaque identifier for a registered worker thread.
///
/// Assigned by the registry at registration time and unique within the
/// process. The identifier only needs to stay valid for the duration of an
/// injection call; keeping it alive past the target's deregistration is
/// allowed and results in a soft miss.
pub type ThreadId = u64;

/// Number of registry entries an injection attempt matched
pub type DeliveryCount = usize;
