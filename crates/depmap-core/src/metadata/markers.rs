//! TODO / FIXME style marker extraction.

use crate::config::TodoEntry;

/// Checked in order; the first one present on a line claims it.
pub const MARKERS: &[&str] = &[
    "TODO:",
    "FIXME:",
    "HACK:",
    "XXX:",
    "DEPRECATED:",
    "WARNING:",
    "CRITICAL:",
];

/// At most one entry per line, numbered from 1.
pub fn extract_todos(content: &str) -> Vec<TodoEntry> {
    content
        .split('\n')
        .enumerate()
        .filter_map(|(idx, line)| {
            let marker = MARKERS.iter().find(|m| line.contains(**m))?;
            Some(TodoEntry {
                line: idx + 1,
                marker: marker.trim_end_matches(':').to_string(),
                text: line.trim().trim_start_matches('#').trim().to_string(),
            })
        })
        .collect()
}
