//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use depmap_core::config::MapConfig;
use depmap_core::graph::{DependencyGraph, GraphBuilder};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Fixture path resolution
// ---------------------------------------------------------------------------

/// Resolve `tests/fixtures/{name}` relative to the workspace root.
pub fn fixture_path(name: &str) -> PathBuf {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../tests/fixtures")
        .join(name);
    dir.canonicalize().unwrap_or(dir)
}

// ---------------------------------------------------------------------------
// Scratch projects
// ---------------------------------------------------------------------------

/// A throwaway project tree. The root is canonicalised so canonical ids
/// come out relative even where the temp directory sits behind a symlink.
pub struct Project {
    _dir: TempDir,
    pub root: PathBuf,
}

impl Project {
    pub fn new(files: &[(&str, &str)]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        for (rel, content) in files {
            let path = root.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        Self { _dir: dir, root }
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    pub fn map(&self, entry: &str, max_depth: usize) -> DependencyGraph {
        GraphBuilder::new(&self.root, max_depth).build(&self.path(entry))
    }

    pub fn config(&self, entry: &str) -> MapConfig {
        MapConfig {
            entry_file: self.path(entry).to_string_lossy().to_string(),
            root_dir: self.root.to_string_lossy().to_string(),
            ..Default::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Runners
// ---------------------------------------------------------------------------

/// Map a checked-in fixture from `entry` with the default depth ceiling.
pub fn map_fixture(name: &str, entry: &str) -> DependencyGraph {
    let root = fixture_path(name);
    GraphBuilder::new(&root, 999).build(&root.join(entry))
}

pub fn fixture_config(name: &str, entry: &str) -> MapConfig {
    let root = fixture_path(name);
    MapConfig {
        entry_file: root.join(entry).to_string_lossy().to_string(),
        root_dir: root.to_string_lossy().to_string(),
        ..Default::default()
    }
}

/// Sorted `(from, to)` pairs, for order-insensitive edge assertions.
pub fn sorted_edges(graph: &DependencyGraph) -> Vec<(String, String)> {
    let mut edges = graph.edges();
    edges.sort();
    edges
}
