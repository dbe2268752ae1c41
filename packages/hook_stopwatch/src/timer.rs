//! Label-keyed accumulating timing records.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use crate::pal::{Platform, PlatformFacade};

/// One accumulating record per distinct label.
///
/// Created lazily on the first start call for its label and discarded with
/// the registry at the end of the activation.
#[derive(Clone, Debug, Default)]
struct TimerRecord {
    /// Start point of the currently open interval. Owned exclusively by the
    /// record between a start and its matching end.
    start_time: Duration,
    /// Heap sample taken at the last start call.
    start_memory: u64,
    accumulated_time: Duration,
    memory_delta: i64,
    peak_memory: u64,
}

/// Aggregated measurements for one label, as returned by snapshots.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[non_exhaustive]
pub struct HookTimings {
    /// Sum of all completed start/end intervals.
    pub elapsed: Duration,
    /// Sum of per-interval heap deltas; negative when the heap shrank.
    pub memory_delta: i64,
    /// Maximum heap sample observed at any end call.
    pub peak_memory: u64,
}

/// Mapping from label to accumulating timing record.
///
/// Repeated start/end cycles for the same label fold into a single record.
/// Starting a label whose interval is still open overwrites the open
/// interval's start point; the outer interval is lost. This is an accepted
/// simplification for recursive or overlapping invocations.
#[derive(Debug)]
pub(crate) struct TimerRegistry {
    records: HashMap<String, TimerRecord>,
    platform: PlatformFacade,
}

impl TimerRegistry {
    pub(crate) fn new(platform: PlatformFacade) -> Self {
        Self {
            records: HashMap::new(),
            platform,
        }
    }

    /// Opens an interval for the label, creating the record on first use.
    pub(crate) fn start(&mut self, label: &str) {
        let memory = self.platform.heap_used();
        let timestamp = self.platform.timestamp();

        let record = self.records.entry(label.to_owned()).or_default();
        record.start_memory = memory;
        record.start_time = timestamp;
    }

    /// Closes the open interval for the label and folds it into the
    /// accumulators. No-op for labels that were never started.
    pub(crate) fn end(&mut self, label: &str) {
        let Some(record) = self.records.get_mut(label) else {
            return;
        };

        let memory = self.platform.heap_used();
        record.accumulated_time = record
            .accumulated_time
            .checked_add(self.platform.elapsed(record.start_time))
            .expect("accumulated time overflows Duration - this indicates an unrealistic scenario");
        record.peak_memory = record.peak_memory.max(memory);

        let end_memory = i64::try_from(memory).expect("heap sizes fit in i64");
        let start_memory = i64::try_from(record.start_memory).expect("heap sizes fit in i64");
        record.memory_delta = record
            .memory_delta
            .checked_add(end_memory - start_memory)
            .expect("memory delta overflows i64 - this indicates an unrealistic scenario");
    }

    /// Aggregated measurements for every known label, in sorted label order
    /// so reports are reproducible.
    ///
    /// Labels with no completed interval yet report zeroed accumulators.
    pub(crate) fn snapshot(&self) -> BTreeMap<String, HookTimings> {
        self.records
            .iter()
            .map(|(label, record)| {
                (
                    label.clone(),
                    HookTimings {
                        elapsed: record.accumulated_time,
                        memory_delta: record.memory_delta,
                        peak_memory: record.peak_memory,
                    },
                )
            })
            .collect()
    }
}
