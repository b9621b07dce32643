//! Depth-first traversal from an entry file.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::canonical_id;
use super::dependency_graph::DependencyGraph;
use crate::metadata::MetadataExtractor;
use crate::resolver::ModuleResolver;

/// Called once per newly visited file with its canonical id and depth.
pub type VisitCallback = Box<dyn FnMut(&str, usize)>;

/// One traversal session. Owns the visited set and the graph under
/// construction; the graph is only handed out by [`GraphBuilder::build`].
pub struct GraphBuilder {
    root: PathBuf,
    max_depth: usize,
    resolver: ModuleResolver,
    extractor: MetadataExtractor,
    visited: HashSet<String>,
    graph: DependencyGraph,
    on_visit: Option<VisitCallback>,
}

impl GraphBuilder {
    pub fn new(root: impl Into<PathBuf>, max_depth: usize) -> Self {
        let root = root.into();
        Self {
            resolver: ModuleResolver::new(root.clone()),
            extractor: MetadataExtractor::new(root.clone()),
            root,
            max_depth,
            visited: HashSet::new(),
            graph: DependencyGraph::new(),
            on_visit: None,
        }
    }

    pub fn with_visit_callback(mut self, callback: VisitCallback) -> Self {
        self.on_visit = Some(callback);
        self
    }

    /// Map everything reachable from `entry` and return the finished graph.
    pub fn build(mut self, entry: &Path) -> DependencyGraph {
        self.process_file(entry, 0);
        self.graph
    }

    /// Returns the canonical id if a node for `path` exists afterwards.
    fn process_file(&mut self, path: &Path, depth: usize) -> Option<String> {
        let id = canonical_id(&self.root, path);

        if self.visited.contains(&id) || depth > self.max_depth {
            return self.graph.contains(&id).then_some(id);
        }
        self.visited.insert(id.clone());

        debug!("{}Mapping: {}", "  ".repeat(depth), id);
        if !path.starts_with(&self.root) {
            warn!("{} lies outside the project root, keyed by absolute path", id);
        }
        if let Some(cb) = self.on_visit.as_mut() {
            cb(&id, depth);
        }

        let mut facets = self.extractor.extract(path, &id);
        for err in facets.errors.drain(..) {
            warn!("{}: {}", id, err);
            self.graph.record_error(format!("{id}: {err}"));
        }
        let imports = facets.imports().to_vec();
        self.graph.add_node(facets.into_node(id.clone(), path.to_path_buf()));

        for import in imports {
            let Some(target) = self.resolver.resolve(&import.specifier, path) else {
                let message = format!(
                    "{}: unresolved import '{}' (line {})",
                    id, import.specifier, import.line
                );
                warn!("{}", message);
                self.graph.record_error(message);
                continue;
            };

            let target_id = canonical_id(&self.root, &target);
            self.graph.add_import(&id, &target_id);

            if self.process_file(&target, depth + 1).is_some() {
                self.graph.add_back_edge(&id, &target_id);
            }
        }

        Some(id)
    }
}
