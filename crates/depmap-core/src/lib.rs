//! depmap core — static dependency mapping for Python source trees.
//!
//! Starting from one entry file, imports are resolved to files under the
//! project root and followed depth-first. Every file reached becomes a node
//! carrying structural metadata (docstring, classes, top-level functions) and
//! heuristic metadata (risk tier, architectural role, TODO markers, external
//! dependencies, linked test file, error handling). Nothing is executed.

pub mod config;
pub mod error;
pub mod graph;
pub mod languages;
pub mod metadata;
pub mod output;
pub mod pipeline;
pub mod project;
pub mod report;
pub mod resolver;
