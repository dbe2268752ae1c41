//! Tracer boundary and label-keyed span registry.
//!
//! The tracer backend is externally supplied; this package only drives span
//! lifecycles and attributes, never inspecting or exporting span data.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use crate::pal::{Platform, PlatformFacade};

/// An externally owned unit of tracing data.
///
/// A span accepts attributes until [`end`](Span::end) is called; ending is
/// terminal and further attribute writes are undefined (this package never
/// performs them).
pub trait Span: Debug + Send {
    /// Sets a single attribute on the span.
    fn set_attribute(&mut self, key: &str, value: u64);

    /// Sets several attributes at once.
    fn set_attributes(&mut self, attributes: &[(&str, u64)]);

    /// Closes the span. No further attributes may be set afterwards.
    fn end(&mut self);
}

/// Capability for creating spans in an external tracing backend.
pub trait Tracer: Debug + Send + Sync {
    /// Starts a new span with the given name.
    fn start_span(&self, name: &str) -> Box<dyn Span>;
}

#[derive(Debug)]
struct SpanRecord {
    span: Box<dyn Span>,
    peak_memory: u64,
}

/// Mapping from label to an open span in the external tracer.
///
/// Only a transient reference to each span is held between its start and end
/// calls; ownership of span data stays with the tracer backend.
#[derive(Debug)]
pub(crate) struct TraceRegistry {
    spans: HashMap<String, SpanRecord>,
    tracer: Arc<dyn Tracer>,
    platform: PlatformFacade,
}

impl TraceRegistry {
    pub(crate) fn new(tracer: Arc<dyn Tracer>, platform: PlatformFacade) -> Self {
        Self {
            spans: HashMap::new(),
            tracer,
            platform,
        }
    }

    /// Opens a span named after the label, unless one is already open.
    pub(crate) fn start(&mut self, label: &str) {
        if self.spans.contains_key(label) {
            return;
        }

        let mut span = self.tracer.start_span(label);
        span.set_attributes(&[("memory", 0), ("totalMemory", 0)]);

        let memory = self.platform.heap_used();
        span.set_attribute("startMemory", memory);

        self.spans.insert(
            label.to_owned(),
            SpanRecord {
                span,
                peak_memory: memory,
            },
        );
    }

    /// Records final memory attributes and closes the span for the label.
    ///
    /// No-op when no span is open for the label.
    pub(crate) fn end(&mut self, label: &str) {
        let Some(mut record) = self.spans.remove(label) else {
            return;
        };

        let memory = self.platform.heap_used();
        record
            .span
            .set_attribute("totalMemory", record.peak_memory.max(memory));
        record.span.set_attribute("endMemory", memory);
        // Closing is terminal; dropping the record afterwards guarantees no
        // further attribute writes.
        record.span.end();
    }
}
