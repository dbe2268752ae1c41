//! Platform abstraction layer for time and heap sampling.
//!
//! This module provides a platform abstraction that allows switching between
//! real measurements (monotonic clock plus the tracking allocator's live-byte
//! counter) and fake implementations for testing purposes.

mod abstractions;
mod facade;
#[cfg(test)]
mod fake;
mod real;

pub(crate) use abstractions::Platform;
pub(crate) use facade::PlatformFacade;
#[cfg(test)]
pub(crate) use fake::FakePlatform;
pub(crate) use real::RealPlatform;
