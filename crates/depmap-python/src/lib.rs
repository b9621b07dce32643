//! PyO3 bindings for the depmap engine.

use std::path::Path;

use pyo3::prelude::*;
use pyo3::types::PyDict;

use depmap_core::config::MapConfig;
use depmap_core::graph::canonical_id;
use depmap_core::pipeline;
use depmap_core::report::{render_markdown as render, ReportContext};

fn to_config(entry: &str, root: Option<&str>, max_depth: usize) -> MapConfig {
    MapConfig::for_entry(Path::new(entry), root.map(Path::new), max_depth)
}

fn runtime_error(e: impl std::fmt::Display) -> PyErr {
    pyo3::exceptions::PyRuntimeError::new_err(e.to_string())
}

/// Map dependencies from `entry` and return the result as a Python dict.
#[pyfunction]
#[pyo3(signature = (entry, root = None, max_depth = 999))]
fn map_dependencies(
    py: Python<'_>,
    entry: &str,
    root: Option<&str>,
    max_depth: usize,
) -> PyResult<Py<PyDict>> {
    let config = to_config(entry, root, max_depth);
    let result = pipeline::run_pipeline(&config, None).map_err(runtime_error)?;

    // Serialize to JSON then parse into Python dict
    let json_str = serde_json::to_string(&result).map_err(runtime_error)?;
    let json_module = py.import("json")?;
    let py_dict = json_module
        .call_method1("loads", (json_str,))?
        .extract::<Py<PyDict>>()?;

    Ok(py_dict)
}

/// Map dependencies from `entry` and return the Markdown report.
#[pyfunction]
#[pyo3(signature = (entry, root = None, max_depth = 999))]
fn render_markdown(entry: &str, root: Option<&str>, max_depth: usize) -> PyResult<String> {
    let config = to_config(entry, root, max_depth);
    let outcome = pipeline::map_dependencies(&config, None).map_err(runtime_error)?;
    let ctx = ReportContext {
        entry: canonical_id(config.root_path(), config.entry_path()),
        root_dir: config.root_dir.clone(),
        max_depth,
    };
    Ok(render(&outcome.graph, &ctx))
}

/// Return the depmap engine version.
#[pyfunction]
fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// depmap Rust engine.
#[pymodule]
fn _depmap_rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(map_dependencies, m)?)?;
    m.add_function(wrap_pyfunction!(render_markdown, m)?)?;
    m.add_function(wrap_pyfunction!(version, m)?)?;
    Ok(())
}
