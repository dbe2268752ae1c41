//! Fake platform implementation for testing.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::pal::Platform;

/// Internal state for the fake platform that can be shared between clones.
#[derive(Debug)]
struct FakePlatformState {
    timestamp: Duration,
    heap_used: u64,
}

/// Fake implementation of the platform abstraction for testing.
///
/// This implementation allows tests to control the clock and the heap sample
/// instead of relying on real measurements. Multiple clones of the same
/// `FakePlatform` share the same underlying state, allowing tests to advance
/// time after platform creation to simulate time progression.
#[derive(Clone, Debug)]
pub(crate) struct FakePlatform {
    state: Arc<Mutex<FakePlatformState>>,
}

impl FakePlatform {
    /// Creates a new fake platform at time zero with an empty heap.
    pub(crate) fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(FakePlatformState {
                timestamp: Duration::ZERO,
                heap_used: 0,
            })),
        }
    }

    /// Advances the fake clock.
    ///
    /// This affects all clones of this platform, allowing tests to simulate
    /// time progression during measurement.
    pub(crate) fn advance_time(&self, delta: Duration) {
        let mut state = self
            .state
            .lock()
            .expect("FakePlatform state lock should not be poisoned");
        state.timestamp += delta;
    }

    /// Sets the reported heap usage value.
    ///
    /// This affects all clones of this platform.
    pub(crate) fn set_heap_used(&self, bytes: u64) {
        self.state
            .lock()
            .expect("FakePlatform state lock should not be poisoned")
            .heap_used = bytes;
    }
}

impl Platform for FakePlatform {
    fn timestamp(&self) -> Duration {
        self.state
            .lock()
            .expect("FakePlatform state lock should not be poisoned")
            .timestamp
    }

    fn heap_used(&self) -> u64 {
        self.state
            .lock()
            .expect("FakePlatform state lock should not be poisoned")
            .heap_used
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initializes_with_zero_values() {
        let platform = FakePlatform::new();
        assert_eq!(platform.timestamp(), Duration::ZERO);
        assert_eq!(platform.heap_used(), 0);
    }

    #[test]
    fn advances_time() {
        let platform = FakePlatform::new();
        platform.advance_time(Duration::from_millis(150));

        assert_eq!(platform.timestamp(), Duration::from_millis(150));
    }

    #[test]
    fn sets_heap_usage() {
        let platform = FakePlatform::new();
        platform.set_heap_used(4096);

        assert_eq!(platform.heap_used(), 4096);
    }

    #[test]
    fn shared_state_between_clones() {
        let platform1 = FakePlatform::new();
        let platform2 = platform1.clone();

        // Changing one clone affects the other.
        platform1.advance_time(Duration::from_millis(100));
        assert_eq!(platform2.timestamp(), Duration::from_millis(100));

        platform2.set_heap_used(200);
        assert_eq!(platform1.heap_used(), 200);
    }
}
