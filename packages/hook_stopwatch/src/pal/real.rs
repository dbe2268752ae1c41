//! Real platform implementation.

use std::sync::LazyLock;
use std::time::{Duration, Instant};

use crate::allocator::heap_live_bytes;
use crate::pal::Platform;

// All timestamps are offsets from this process-local epoch, captured the
// first time any session asks for the time.
static EPOCH: LazyLock<Instant> = LazyLock::new(Instant::now);

/// Platform backed by the operating system's monotonic clock and the
/// tracking allocator's live-byte counter.
///
/// `std::time::Instant` is the highest-resolution monotonic source the
/// runtime offers, so no coarser fallback is needed; heap sampling degrades
/// to zero when the tracking allocator is not installed.
#[derive(Clone, Debug)]
pub(crate) struct RealPlatform;

impl Platform for RealPlatform {
    fn timestamp(&self) -> Duration {
        EPOCH.elapsed()
    }

    fn heap_used(&self) -> u64 {
        heap_live_bytes()
    }
}
