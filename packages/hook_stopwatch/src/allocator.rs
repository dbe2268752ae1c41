//! Allocation wrapper that enables heap usage sampling.

use std::alloc::{GlobalAlloc, Layout};
use std::fmt;
use std::sync::atomic::{self, AtomicU64};

// Live heap bytes across the whole process. The platform layer reads this on
// every memory sample; when the tracking allocator is not installed the value
// stays at zero and all memory measurements degrade to zero.
static HEAP_LIVE_BYTES: AtomicU64 = AtomicU64::new(0);

/// Current live heap usage in bytes, or zero when no tracking allocator is
/// installed.
#[inline]
pub(crate) fn heap_live_bytes() -> u64 {
    HEAP_LIVE_BYTES.load(atomic::Ordering::Relaxed)
}

#[inline]
fn track_allocation(size: usize) {
    let size_u64: u64 = size.try_into().expect("usize always fits into u64");
    // Relaxed is sufficient: we only need atomicity, not ordering w.r.t. other memory ops.
    HEAP_LIVE_BYTES.fetch_add(size_u64, atomic::Ordering::Relaxed);
}

#[inline]
fn track_deallocation(size: usize) {
    let size_u64: u64 = size.try_into().expect("usize always fits into u64");
    // Every dealloc pairs with an alloc that went through this same wrapper
    // when it is installed as the global allocator, so this cannot underflow.
    HEAP_LIVE_BYTES.fetch_sub(size_u64, atomic::Ordering::Relaxed);
}

/// A memory allocator that maintains a live-byte counter for heap sampling.
///
/// This allocator wraps any [`GlobalAlloc`] implementation, delegating every
/// operation to it while keeping count of bytes currently allocated. The
/// wrapped allocator's behavior and performance characteristics are otherwise
/// unchanged.
///
/// # Examples
///
/// ```rust
/// use hook_stopwatch::Allocator;
///
/// #[global_allocator]
/// static ALLOCATOR: Allocator<std::alloc::System> = Allocator::system();
/// ```
pub struct Allocator<A: GlobalAlloc> {
    inner: A,
}

impl<A: GlobalAlloc> fmt::Debug for Allocator<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Allocator")
            .field("inner", &"<allocator>")
            .finish()
    }
}

impl Allocator<std::alloc::System> {
    /// Creates a new tracking allocator using the system's default allocator.
    ///
    /// This is a convenience method for the common case of wanting heap
    /// sampling without changing the underlying allocation strategy.
    #[must_use]
    #[inline]
    pub const fn system() -> Self {
        Self {
            inner: std::alloc::System,
        }
    }
}

impl<A: GlobalAlloc> Allocator<A> {
    /// Creates a new tracking allocator wrapping the provided allocator.
    #[must_use]
    #[inline]
    pub const fn new(allocator: A) -> Self {
        Self { inner: allocator }
    }
}

// SAFETY: We delegate all allocation operations to the underlying allocator,
// which already implements GlobalAlloc safely, while adding tracking functionality.
unsafe impl<A: GlobalAlloc> GlobalAlloc for Allocator<A> {
    #[inline]
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        track_allocation(layout.size());

        // SAFETY: We forward the call to the underlying allocator which implements GlobalAlloc.
        unsafe { self.inner.alloc(layout) }
    }

    #[inline]
    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        track_deallocation(layout.size());

        // SAFETY: We forward the call to the underlying allocator which implements GlobalAlloc.
        unsafe { self.inner.dealloc(ptr, layout) }
    }

    #[inline]
    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        track_allocation(layout.size());

        // SAFETY: We forward the call to the underlying allocator which implements GlobalAlloc.
        unsafe { self.inner.alloc_zeroed(layout) }
    }

    #[inline]
    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        track_deallocation(layout.size());
        track_allocation(new_size);

        // SAFETY: We forward the call to the underlying allocator which implements GlobalAlloc.
        unsafe { self.inner.realloc(ptr, layout, new_size) }
    }
}
