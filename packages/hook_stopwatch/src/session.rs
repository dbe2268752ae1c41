//! Per-activation instrumentation state and mode selection.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use crate::instrument::{TIMED_HOOKS, instrument};
use crate::label::format_label;
use crate::pal::PlatformFacade;
use crate::plugin::Plugin;
use crate::timer::{HookTimings, TimerRegistry};
use crate::trace::{TraceRegistry, Tracer};
use crate::{ERR_POISONED_LOCK, Report};

/// Configuration recognised at session initialisation.
///
/// `trace` takes precedence over `perf` when both are set.
#[derive(Clone, Copy, Debug, Default)]
pub struct SessionOptions {
    /// Enables local timing: allow-listed hooks are wrapped and their
    /// measurements accumulate in the session, retrievable via
    /// [`Session::timings`].
    pub perf: bool,
    /// Enables tracing: measurements are emitted as spans into the supplied
    /// tracer instead of being accumulated locally.
    pub trace: bool,
}

/// The instrumentation strategy selected for one activation.
///
/// Replaces the rebindable start/end function-slot pair of the original
/// design with an enumerated mode carrying the state it needs.
#[derive(Debug)]
enum Mode {
    Disabled,
    Timing(TimerRegistry),
    Tracing(TraceRegistry),
}

/// Instrumentation state for one activation (one build).
///
/// The mode is fixed at initialisation and only re-evaluated by creating a
/// new session, which starts from empty registries. Clones share state, so
/// wrapped hooks and their deferred continuations observe the same session
/// they were created under.
///
/// # Examples
///
/// ```
/// use hook_stopwatch::{Session, SessionOptions};
///
/// let mut plugins: Vec<std::sync::Arc<hook_stopwatch::Plugin<String>>> = Vec::new();
/// let session = Session::initialise(
///     SessionOptions {
///         perf: true,
///         trace: false,
///     },
///     None,
///     &mut plugins,
/// );
///
/// session.time_start("build", 3);
/// // ... the measured work ...
/// session.time_end("build", 3);
///
/// assert!(session.timings().contains_key("build"));
/// ```
#[derive(Clone, Debug)]
pub struct Session {
    mode: Arc<Mutex<Mode>>,
}

impl Session {
    /// Creates the session for one activation and rewrites the plugin list
    /// for the selected mode.
    ///
    /// Mode selection: `trace` with a tracer supplied wins over `perf`;
    /// `trace` without a tracer degrades to the disabled mode (capability
    /// absence is never an error). With neither flag the session is
    /// disabled and the plugin list is left untouched.
    ///
    /// Only the timing mode rewrites the plugin list: allow-listed hooks
    /// (see [`TIMED_HOOKS`]) are replaced with timed wrappers. The tracing
    /// mode intentionally leaves the list as-is; hook wrapping for spans is
    /// an unimplemented extension point.
    pub fn initialise<T>(
        options: SessionOptions,
        tracer: Option<Arc<dyn Tracer>>,
        plugins: &mut [Arc<Plugin<T>>],
    ) -> Self
    where
        T: 'static,
    {
        Self::initialise_with_platform(options, tracer, plugins, PlatformFacade::real())
    }

    /// [`initialise`](Self::initialise) with an injected platform, used by
    /// tests that need a controllable clock and heap sample.
    pub(crate) fn initialise_with_platform<T>(
        options: SessionOptions,
        tracer: Option<Arc<dyn Tracer>>,
        plugins: &mut [Arc<Plugin<T>>],
        platform: PlatformFacade,
    ) -> Self
    where
        T: 'static,
    {
        let mode = if options.trace {
            match tracer {
                Some(tracer) => Mode::Tracing(TraceRegistry::new(tracer, platform)),
                None => Mode::Disabled,
            }
        } else if options.perf {
            Mode::Timing(TimerRegistry::new(platform))
        } else {
            Mode::Disabled
        };

        let is_timing = matches!(mode, Mode::Timing(_));
        let session = Self {
            mode: Arc::new(Mutex::new(mode)),
        };

        if is_timing {
            instrument(plugins, TIMED_HOOKS, &session);
        }

        session
    }

    /// Opens a measurement interval for the label rendered from `name` and
    /// `level`. No-op in the disabled mode.
    pub fn time_start(&self, name: &str, level: u32) {
        let mut mode = self.mode.lock().expect(ERR_POISONED_LOCK);
        match &mut *mode {
            Mode::Disabled => {}
            Mode::Timing(registry) => registry.start(&format_label(name, level)),
            Mode::Tracing(registry) => registry.start(&format_label(name, level)),
        }
    }

    /// Closes the measurement interval for the label rendered from `name`
    /// and `level`. No-op in the disabled mode and for unknown labels.
    pub fn time_end(&self, name: &str, level: u32) {
        let mut mode = self.mode.lock().expect(ERR_POISONED_LOCK);
        match &mut *mode {
            Mode::Disabled => {}
            Mode::Timing(registry) => registry.end(&format_label(name, level)),
            Mode::Tracing(registry) => registry.end(&format_label(name, level)),
        }
    }

    /// Aggregated measurements per label observed so far.
    ///
    /// Empty outside the timing mode; the tracing mode hands its data to the
    /// tracer backend instead.
    #[must_use]
    pub fn timings(&self) -> BTreeMap<String, HookTimings> {
        let mode = self.mode.lock().expect(ERR_POISONED_LOCK);
        match &*mode {
            Mode::Timing(registry) => registry.snapshot(),
            Mode::Disabled | Mode::Tracing(_) => BTreeMap::new(),
        }
    }

    /// Creates a report from the current timings snapshot.
    #[must_use]
    pub fn to_report(&self) -> Report {
        Report::from_timings(self.timings())
    }

    /// Whether the session has recorded anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_report().is_empty()
    }

    /// Prints the timing statistics of all labels to stdout.
    ///
    /// This is a convenience method equivalent to
    /// `self.to_report().print_to_stdout()`. Prints nothing if nothing was
    /// recorded, not even an empty line, which can be functionally critical
    /// when the host tool speaks an output protocol of its own.
    #[cfg_attr(test, mutants::skip)] // Too difficult to test stdout output reliably - manually tested.
    pub fn print_to_stdout(&self) {
        self.to_report().print_to_stdout();
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Delegate to Report's Display implementation for consistency.
        write!(f, "{}", self.to_report())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::pal::FakePlatform;
    use crate::plugin::HookOutput;
    use crate::trace::test_tracer::RecordingTracer;

    fn fake_session(options: SessionOptions, tracer: Option<Arc<dyn Tracer>>) -> (Session, FakePlatform) {
        let fake = FakePlatform::new();
        let session = Session::initialise_with_platform::<u32>(
            options,
            tracer,
            &mut Vec::new(),
            PlatformFacade::fake(fake.clone()),
        );
        (session, fake)
    }

    fn sample_plugins() -> Vec<Arc<Plugin<u32>>> {
        vec![Arc::new(
            Plugin::builder()
                .name("p")
                .hook("transform", |_plugin, value| Ok(HookOutput::Ready(value)))
                .hook("buildEnd", |_plugin, value| Ok(HookOutput::Ready(value)))
                .build(),
        )]
    }

    #[test]
    fn disabled_session_records_nothing() {
        let (session, fake) = fake_session(SessionOptions::default(), None);

        session.time_start("build", 3);
        fake.advance_time(Duration::from_millis(10));
        session.time_end("build", 3);

        assert!(session.timings().is_empty());
        assert!(session.is_empty());
    }

    #[test]
    fn disabled_session_leaves_plugin_list_untouched() {
        let mut plugins = sample_plugins();
        let original = Arc::clone(&plugins[0]);

        let _session = Session::initialise_with_platform(
            SessionOptions::default(),
            None,
            &mut plugins,
            PlatformFacade::fake(FakePlatform::new()),
        );

        assert!(Arc::ptr_eq(&original, &plugins[0]));
    }

    #[test]
    fn timing_session_rewrites_plugin_list() {
        let mut plugins = sample_plugins();
        let original = Arc::clone(&plugins[0]);

        let _session = Session::initialise_with_platform(
            SessionOptions {
                perf: true,
                trace: false,
            },
            None,
            &mut plugins,
            PlatformFacade::fake(FakePlatform::new()),
        );

        assert!(!Arc::ptr_eq(&original, &plugins[0]));
    }

    #[test]
    fn timing_session_accumulates_under_rendered_label() {
        let (session, fake) = fake_session(
            SessionOptions {
                perf: true,
                trace: false,
            },
            None,
        );

        session.time_start("build", 3);
        fake.advance_time(Duration::from_millis(5));
        session.time_end("build", 3);

        let timings = session.timings();
        assert_eq!(timings["build"].elapsed, Duration::from_millis(5));
    }

    #[test]
    fn trace_takes_precedence_over_perf() {
        let tracer = Arc::new(RecordingTracer::new());
        let (session, _fake) = fake_session(
            SessionOptions {
                perf: true,
                trace: true,
            },
            Some(Arc::clone(&tracer) as Arc<dyn Tracer>),
        );

        session.time_start("build", 3);
        session.time_end("build", 3);

        // Span creation is observed instead of timer-record creation.
        assert!(session.timings().is_empty());
        assert_eq!(tracer.spans().len(), 1);
        assert!(tracer.spans()[0].ended);
    }

    #[test]
    fn tracing_session_does_not_rewrite_plugin_list() {
        let tracer = Arc::new(RecordingTracer::new());
        let mut plugins = sample_plugins();
        let original = Arc::clone(&plugins[0]);

        let _session = Session::initialise_with_platform(
            SessionOptions {
                perf: false,
                trace: true,
            },
            Some(tracer as Arc<dyn Tracer>),
            &mut plugins,
            PlatformFacade::fake(FakePlatform::new()),
        );

        assert!(Arc::ptr_eq(&original, &plugins[0]));
    }

    #[test]
    fn trace_without_tracer_degrades_to_disabled() {
        let (session, _fake) = fake_session(
            SessionOptions {
                perf: false,
                trace: true,
            },
            None,
        );

        session.time_start("build", 3);
        session.time_end("build", 3);

        assert!(session.timings().is_empty());
    }

    #[test]
    fn new_session_starts_from_empty_registries() {
        let (first, fake) = fake_session(
            SessionOptions {
                perf: true,
                trace: false,
            },
            None,
        );

        first.time_start("build", 3);
        fake.advance_time(Duration::from_millis(5));
        first.time_end("build", 3);
        assert!(!first.is_empty());

        let (second, _fake) = fake_session(
            SessionOptions {
                perf: true,
                trace: false,
            },
            None,
        );
        assert!(second.is_empty());
    }

    #[test]
    fn clones_share_registry_state() {
        let (session, fake) = fake_session(
            SessionOptions {
                perf: true,
                trace: false,
            },
            None,
        );
        let clone = session.clone();

        clone.time_start("build", 3);
        fake.advance_time(Duration::from_millis(2));
        clone.time_end("build", 3);

        assert_eq!(
            session.timings()["build"].elapsed,
            Duration::from_millis(2)
        );
    }

    #[test]
    fn display_delegates_to_report() {
        let (session, fake) = fake_session(
            SessionOptions {
                perf: true,
                trace: false,
            },
            None,
        );

        session.time_start("build", 3);
        fake.advance_time(Duration::from_millis(5));
        session.time_end("build", 3);

        let rendered = session.to_string();
        assert!(rendered.contains("build"));
    }

    // The type is thread-safe.
    static_assertions::assert_impl_all!(Session: Send, Sync);
}
