//! Facade dispatching between the real and fake platforms.

use std::time::Duration;

#[cfg(test)]
use crate::pal::FakePlatform;
use crate::pal::{Platform, RealPlatform};

/// Hides the choice of platform implementation from the rest of the package.
#[derive(Clone, Debug)]
pub(crate) enum PlatformFacade {
    Real(RealPlatform),

    #[cfg(test)]
    Fake(FakePlatform),
}

impl PlatformFacade {
    /// Capability selection for the current runtime; evaluated once per
    /// activation when a session is initialised.
    pub(crate) fn real() -> Self {
        Self::Real(RealPlatform)
    }

    #[cfg(test)]
    pub(crate) fn fake(platform: FakePlatform) -> Self {
        Self::Fake(platform)
    }

    /// Milliseconds elapsed since an earlier timestamp from this platform.
    pub(crate) fn elapsed(&self, since: Duration) -> Duration {
        self.timestamp().saturating_sub(since)
    }
}

impl Platform for PlatformFacade {
    fn timestamp(&self) -> Duration {
        match self {
            Self::Real(platform) => platform.timestamp(),
            #[cfg(test)]
            Self::Fake(platform) => platform.timestamp(),
        }
    }

    fn heap_used(&self) -> u64 {
        match self {
            Self::Real(platform) => platform.heap_used(),
            #[cfg(test)]
            Self::Fake(platform) => platform.heap_used(),
        }
    }
}
