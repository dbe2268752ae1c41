//! Wall-clock and heap-delta instrumentation for plugin pipeline hooks.
//!
//! This package wraps the named hooks of a plugin pipeline so that every
//! invocation of an allow-listed hook is timed and its heap-memory delta
//! recorded, with repeated invocations of the same logical operation
//! aggregated under one label. The same measurements can instead be emitted
//! as spans into an externally supplied tracer backend.
//!
//! The core functionality includes:
//! - [`Session`] - Per-activation instrumentation state; selects one of three
//!   modes (disabled, timing, tracing) at initialisation
//! - [`Plugin`] - A pipeline extension described as a capability set of named
//!   hook functions
//! - [`instrument`] - Replaces a plugin list's allow-listed hooks with timed
//!   wrappers, leaving all other hooks untouched
//! - [`Report`] - Snapshot of accumulated timings, printable to stdout
//! - [`Allocator`] - Optional global allocator wrapper that enables heap
//!   usage sampling; without it all memory measurements read as zero
//!
//! This package is not meant for use in production, serving only as a
//! development tool.
//!
//! # Simple usage
//!
//! ```
//! use std::sync::Arc;
//!
//! use hook_stopwatch::{HookOutput, Plugin, Session, SessionOptions};
//!
//! # fn main() {
//! let mut plugins = vec![Arc::new(
//!     Plugin::<String>::builder()
//!         .name("uppercase")
//!         .hook("transform", |_plugin, code: String| {
//!             Ok(HookOutput::Ready(code.to_uppercase()))
//!         })
//!         .build(),
//! )];
//!
//! let session = Session::initialise(
//!     SessionOptions {
//!         perf: true,
//!         trace: false,
//!     },
//!     None,
//!     &mut plugins,
//! );
//!
//! let hook = plugins[0].hook("transform").unwrap();
//! hook(&plugins[0], "let x = 1;".to_string()).unwrap();
//!
//! // Print accumulated timings; prints nothing if nothing was recorded.
//! session.print_to_stdout();
//! # }
//! ```
//!
//! # Tracing mode
//!
//! Supplying a tracer capability and `trace: true` emits each measurement as
//! a span instead of a local timing record. The plugin list is not rewritten
//! in this mode; only explicit [`Session::time_start`]/[`Session::time_end`]
//! calls produce spans.
//!
//! # Heap sampling
//!
//! Memory figures come from the live-byte counter maintained by
//! [`Allocator`]. Install it as the global allocator to get real numbers:
//!
//! ```
//! use hook_stopwatch::Allocator;
//!
//! #[global_allocator]
//! static ALLOCATOR: Allocator<std::alloc::System> = Allocator::system();
//! ```
//!
//! Without it, every memory sample reads zero. Absence of a capability never
//! fails; it degrades the measurement.
//!
//! # Session management
//!
//! A [`Session`] covers one activation (one build). Re-initialising creates a
//! fresh session with empty registries; the old session's data is discarded
//! with it. Multiple sessions can coexist as they share no state.

mod allocator;
mod constants;
mod instrument;
mod label;
mod pal;
mod plugin;
mod report;
mod session;
mod timer;
mod trace;

pub(crate) use constants::ERR_POISONED_LOCK;

pub use allocator::Allocator;
pub use instrument::{TIMED_HOOKS, instrument};
pub use label::{DEFAULT_LEVEL, HOOK_LEVEL, format_label};
pub use plugin::{Hook, HookError, HookOutput, HookResult, Plugin, PluginBuilder};
pub use report::Report;
pub use session::{Session, SessionOptions};
pub use timer::HookTimings;
pub use trace::{Span, Tracer};
