//! JSON serialisation of a finished graph.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::Utc;

use crate::config::{EdgeOutput, MapConfig, MapResult};
use crate::graph::{canonical_id, DependencyGraph};

/// Build the MapResult from the dependency graph.
pub fn build_result(config: &MapConfig, graph: &DependencyGraph, duration_ms: f64) -> MapResult {
    let root = Path::new(&config.root_dir);
    let entry = canonical_id(root, Path::new(&config.entry_file));
    let cycles = graph.import_cycles();

    let mut metadata = BTreeMap::new();
    metadata.insert("entry".to_string(), serde_json::Value::String(entry));
    metadata.insert(
        "root_dir".to_string(),
        serde_json::Value::String(config.root_dir.clone()),
    );
    metadata.insert("max_depth".to_string(), serde_json::json!(config.max_depth));
    metadata.insert(
        "generated_at".to_string(),
        serde_json::Value::String(Utc::now().to_rfc3339()),
    );
    metadata.insert(
        "duration_ms".to_string(),
        serde_json::json!((duration_ms * 100.0).round() / 100.0),
    );
    metadata.insert(
        "depmap_version".to_string(),
        serde_json::Value::String(env!("CARGO_PKG_VERSION").to_string()),
    );

    let risk: serde_json::Map<String, serde_json::Value> = graph
        .risk_distribution()
        .into_iter()
        .map(|(level, count)| (level.as_str().to_string(), serde_json::json!(count)))
        .collect();

    let mut stats = BTreeMap::new();
    stats.insert("files".to_string(), serde_json::json!(graph.node_count()));
    stats.insert("edges".to_string(), serde_json::json!(graph.edge_count()));
    stats.insert("errors".to_string(), serde_json::json!(graph.errors().len()));
    stats.insert("cycles".to_string(), serde_json::json!(cycles.len()));
    stats.insert(
        "external_dependencies".to_string(),
        serde_json::json!(graph.external_dependencies().len()),
    );
    stats.insert("risk".to_string(), serde_json::Value::Object(risk));

    let edges = graph
        .edges()
        .into_iter()
        .map(|(from, to)| EdgeOutput { from, to })
        .collect();

    MapResult {
        version: "1.0".to_string(),
        metadata,
        stats,
        nodes: graph.nodes().cloned().collect(),
        edges,
        errors: graph.errors().to_vec(),
        cycles,
    }
}

/// Write the map result to a JSON file.
pub fn write_output(result: &MapResult, output_path: &str) -> std::io::Result<()> {
    if let Some(parent) = Path::new(output_path).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(result).map_err(std::io::Error::other)?;
    std::fs::write(output_path, json)
}
