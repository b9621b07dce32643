//! Dependency graph storage and the traversal that fills it.

use std::path::Path;

pub mod builder;
pub mod dependency_graph;

pub use builder::GraphBuilder;
pub use dependency_graph::DependencyGraph;

/// Root-relative `/`-separated path, or the path itself when it lies outside
/// the root.
pub fn canonical_id(root: &Path, path: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(rel) => rel.to_string_lossy().replace('\\', "/"),
        Err(_) => path.to_string_lossy().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_id_inside_root() {
        assert_eq!(
            canonical_id(Path::new("/repo"), Path::new("/repo/pkg/mod.py")),
            "pkg/mod.py"
        );
    }

    #[test]
    fn canonical_id_outside_root_is_absolute() {
        assert_eq!(
            canonical_id(Path::new("/repo"), Path::new("/elsewhere/mod.py")),
            "/elsewhere/mod.py"
        );
    }
}
