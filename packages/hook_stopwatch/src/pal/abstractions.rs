//! Platform abstraction trait definitions.

use std::fmt::Debug;
use std::time::Duration;

/// Provides elapsed-time and heap-usage measurement primitives.
///
/// This trait abstracts the underlying measurement mechanisms, allowing for
/// both real implementations (monotonic clock, allocator counters) and fake
/// implementations (for testing).
///
/// Neither operation can fail: a platform without a usable capability
/// reports zero instead.
pub(crate) trait Platform: Debug + Send + Sync + 'static {
    /// Gets an opaque monotonic timestamp, expressed as the offset from an
    /// arbitrary process-local epoch.
    ///
    /// Timestamps are only meaningful when subtracted from a later timestamp
    /// taken from the same platform.
    fn timestamp(&self) -> Duration;

    /// Gets the current heap usage in bytes, or zero if the runtime exposes
    /// no heap metric.
    fn heap_used(&self) -> u64;
}
