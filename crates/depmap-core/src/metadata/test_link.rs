//! Locating the test file that covers a module.

use std::path::{Path, PathBuf};

use crate::graph::canonical_id;

/// Conventional test locations, probed in order.
fn test_candidates(root: &Path, file: &Path) -> Vec<PathBuf> {
    let Some(stem) = file.file_stem().map(|s| s.to_string_lossy().to_string()) else {
        return Vec::new();
    };
    let dir = file.parent().unwrap_or(root);

    let prefixed = format!("test_{stem}.py");
    let suffixed = format!("{stem}_test.py");
    vec![
        root.join("tests").join(&prefixed),
        root.join("test").join(&prefixed),
        dir.join(&prefixed),
        root.join("tests").join(&suffixed),
        root.join("test").join(&suffixed),
        dir.join(&suffixed),
    ]
}

/// Canonical id of the first existing test file for `file`.
pub fn find_test_file(root: &Path, file: &Path) -> Option<String> {
    test_candidates(root, file)
        .into_iter()
        .find(|c| c.is_file())
        .map(|c| canonical_id(root, &c))
}
