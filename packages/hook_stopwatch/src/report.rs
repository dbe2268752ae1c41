//! Timing reports.

use std::collections::BTreeMap;
use std::fmt;

use crate::timer::HookTimings;

/// Snapshot of all timing statistics captured by a [`Session`](crate::Session).
///
/// A report is detached from the session it came from and can be sent to
/// another thread for processing or rendering.
///
/// # Examples
///
/// ```
/// use hook_stopwatch::{Session, SessionOptions};
///
/// let session = Session::initialise::<String>(
///     SessionOptions {
///         perf: true,
///         trace: false,
///     },
///     None,
///     &mut Vec::new(),
/// );
///
/// session.time_start("build", 3);
/// session.time_end("build", 3);
///
/// let report = session.to_report();
/// report.print_to_stdout();
/// ```
#[derive(Clone, Debug)]
pub struct Report {
    rows: BTreeMap<String, HookTimings>,
}

impl Report {
    pub(crate) fn from_timings(rows: BTreeMap<String, HookTimings>) -> Self {
        Self { rows }
    }

    /// The aggregated measurements for one label, if that label was
    /// observed.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&HookTimings> {
        self.rows.get(label)
    }

    /// Iterates over all labels and their measurements in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &HookTimings)> {
        self.rows.iter().map(|(label, row)| (label.as_str(), row))
    }

    /// Whether there is any recorded activity in this report.
    ///
    /// Labels whose intervals never completed count as no activity.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.rows.values().all(|row| *row == HookTimings::default())
    }

    /// Prints the report to stdout.
    ///
    /// Prints nothing if no measurements were captured. This may indicate
    /// that the session belonged to a probe run instead of some real
    /// activity, in which case printing anything might violate the output
    /// protocol the host tool is speaking.
    #[cfg_attr(test, mutants::skip)] // Too difficult to test stdout output reliably - manually tested.
    pub fn print_to_stdout(&self) {
        if self.is_empty() {
            return;
        }
        println!("{self}");
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (label, row) in &self.rows {
            writeln!(
                f,
                "{label}: {:.2} ms, {} bytes delta, {} bytes peak",
                row.elapsed.as_secs_f64() * 1000.0,
                row.memory_delta,
                row.peak_memory,
            )?;
        }
        Ok(())
    }
}
