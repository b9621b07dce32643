//! Run orchestration with timing.

use std::path::Path;
use std::time::Instant;

use tracing::info;

use crate::config::{MapConfig, MapResult};
use crate::graph::{DependencyGraph, GraphBuilder};
use crate::output::build_result;

/// Progress callback type: (canonical_id, depth) of each newly visited file.
pub type ProgressCallback = crate::graph::builder::VisitCallback;

/// A finished run: the graph plus how long the traversal took.
pub struct MappingOutcome {
    pub graph: DependencyGraph,
    pub duration_ms: f64,
}

/// Traverse from the configured entry file. The configuration is validated
/// first; traversal itself never fails.
pub fn map_dependencies(
    config: &MapConfig,
    progress_callback: Option<ProgressCallback>,
) -> Result<MappingOutcome, Box<dyn std::error::Error>> {
    config.validate()?;

    info!("Mapping dependencies from: {}", config.entry_file);
    info!("Root directory: {}", config.root_dir);
    info!("Max depth: {}", config.max_depth);

    let start = Instant::now();
    let mut builder = GraphBuilder::new(config.root_path(), config.max_depth);
    if let Some(cb) = progress_callback {
        builder = builder.with_visit_callback(cb);
    }
    let graph = builder.build(Path::new(&config.entry_file));
    let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

    info!(
        "Mapped {} files, {} edges, {} errors",
        graph.node_count(),
        graph.edge_count(),
        graph.errors().len()
    );

    Ok(MappingOutcome { graph, duration_ms })
}

/// Traverse and convert the graph into its serialisable form.
pub fn run_pipeline(
    config: &MapConfig,
    progress_callback: Option<ProgressCallback>,
) -> Result<MapResult, Box<dyn std::error::Error>> {
    let outcome = map_dependencies(config, progress_callback)?;
    Ok(build_result(config, &outcome.graph, outcome.duration_ms))
}
