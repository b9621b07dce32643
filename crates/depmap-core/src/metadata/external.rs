//! Third-party dependency detection.

use std::collections::BTreeSet;
use std::path::Path;

use crate::config::ImportStatement;

/// Top-level names treated as project code regardless of what is on disk.
const RESERVED_PROJECT_NAMES: &[&str] = &["src", "app", "lib", "core", "config"];

/// Whether a top-level import name belongs to the project rather than a
/// third-party distribution.
pub fn is_project_module(name: &str, root: &Path) -> bool {
    name.starts_with('.') || RESERVED_PROJECT_NAMES.contains(&name) || root.join(name).is_dir()
}

/// Sorted, deduplicated top-level names of absolute imports outside the project.
pub fn external_dependencies(imports: &[ImportStatement], root: &Path) -> BTreeSet<String> {
    imports
        .iter()
        .filter_map(ImportStatement::top_level_name)
        .filter(|name| !is_project_module(name, root))
        .map(str::to_string)
        .collect()
}
