//! Language support. Python is the only source language depmap maps.

pub mod python;

/// Extension appended to a resolved module path.
pub const SOURCE_EXTENSION: &str = "py";

/// File that turns a directory into an importable package.
pub const PACKAGE_INITIALIZER: &str = "__init__.py";
