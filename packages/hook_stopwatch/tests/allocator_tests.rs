//! Integration test with the tracking allocator installed for real.
//!
//! A `#[global_allocator]` is process-wide, so this lives in its own test
//! binary. A single test keeps other threads from allocating concurrently
//! and polluting the deltas.

use std::hint::black_box;
use std::sync::Arc;

use hook_stopwatch::{Allocator, Plugin, Session, SessionOptions};

#[global_allocator]
static ALLOCATOR: Allocator<std::alloc::System> = Allocator::system();

const BUFFER_LEN: usize = 8 * 1024 * 1024;

#[test]
fn heap_deltas_reflect_real_allocations() {
    let session = Session::initialise::<String>(
        SessionOptions {
            perf: true,
            trace: false,
        },
        None,
        &mut Vec::<Arc<Plugin<String>>>::new(),
    );

    // Growth: the buffer outlives the interval, so the delta must cover it.
    session.time_start("grow", 3);
    let buffer = vec![0_u8; BUFFER_LEN];
    black_box(&buffer);
    session.time_end("grow", 3);

    // Shrinkage: the buffer is freed inside the interval.
    session.time_start("shrink", 3);
    drop(buffer);
    session.time_end("shrink", 3);

    let timings = session.timings();

    let grow = &timings["grow"];
    let expected = i64::try_from(BUFFER_LEN).expect("buffer length fits in i64");
    assert!(
        grow.memory_delta >= expected,
        "expected at least {expected} bytes of growth, got {}",
        grow.memory_delta
    );
    assert!(grow.peak_memory >= u64::try_from(BUFFER_LEN).expect("buffer length fits in u64"));

    let shrink = &timings["shrink"];
    assert!(
        shrink.memory_delta <= -expected,
        "expected at least {expected} bytes of shrinkage, got {}",
        shrink.memory_delta
    );
}
