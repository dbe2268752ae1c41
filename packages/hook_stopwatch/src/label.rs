//! Label rendering for timing and tracing records.
//!
//! A rendered label is the sole aggregation identity: two measurements with
//! the same rendered label accumulate into the same record regardless of
//! call site.

/// The nesting level used when none is specified by the caller.
pub const DEFAULT_LEVEL: u32 = 3;

/// The nesting level at which instrumented plugin hooks record themselves.
pub const HOOK_LEVEL: u32 = 4;

/// Renders an operation name and nesting level into a display label.
///
/// Levels 1 and 2 render as markdown-style headers, level 3 renders the name
/// bare, and levels of 4 and above render as a bullet indented two spaces
/// per level beyond 4. Total over all levels; deterministic.
///
/// # Examples
///
/// ```
/// use hook_stopwatch::format_label;
///
/// assert_eq!(format_label("build", 1), "# build");
/// assert_eq!(format_label("build", 2), "## build");
/// assert_eq!(format_label("build", 3), "build");
/// assert_eq!(format_label("build", 4), "- build");
/// assert_eq!(format_label("build", 5), "  - build");
/// ```
#[must_use]
pub fn format_label(name: &str, level: u32) -> String {
    match level {
        1 => format!("# {name}"),
        2 => format!("## {name}"),
        level if level > 3 => {
            let indent = usize::try_from((level - 4).saturating_mul(2))
                .expect("indent width always fits in usize");
            format!("{:indent$}- {name}", "")
        }
        // Levels 0 and 3 render the bare name.
        _ => name.to_owned(),
    }
}
