//! Core data types and configuration for a depmap run.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::project::detect_project_root;

/// Heuristic risk tier of a source file.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    High,
    Medium,
    Low,
    #[default]
    Unknown,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Badge used by the Markdown report.
    pub fn emoji(&self) -> &'static str {
        match self {
            Self::High => "🔴",
            Self::Medium => "🟡",
            Self::Low => "🟢",
            Self::Unknown => "⚪",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Architectural role guessed from a file's path and name.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ArchitecturalRole {
    Controller,
    Model,
    View,
    Utility,
    Configuration,
    Test,
    PackageInitializer,
    #[default]
    Other,
}

impl ArchitecturalRole {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Controller => "Controller (MVC)",
            Self::Model => "Model (Data Layer)",
            Self::View => "View (UI Layer)",
            Self::Utility => "Utility (Helper Functions)",
            Self::Configuration => "Configuration",
            Self::Test => "Test",
            Self::PackageInitializer => "Package Initializer",
            Self::Other => "Other",
        }
    }
}

impl std::fmt::Display for ArchitecturalRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A TODO-style marker found in a source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoEntry {
    /// 1-based line number.
    pub line: usize,
    pub marker: String,
    pub text: String,
}

impl std::fmt::Display for TodoEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Line {}: {}", self.line, self.text)
    }
}

/// One module specifier pulled from an import statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportStatement {
    /// Module specifier as written, e.g. `pkg.mod` or `..sibling`.
    pub specifier: String,
    pub line: usize,
}

impl ImportStatement {
    pub fn is_relative(&self) -> bool {
        self.specifier.starts_with('.')
    }

    /// First dotted segment of an absolute specifier.
    pub fn top_level_name(&self) -> Option<&str> {
        if self.is_relative() {
            return None;
        }
        self.specifier.split('.').next().filter(|s| !s.is_empty())
    }
}

/// A source file in the dependency graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileNode {
    /// Canonical id: root-relative path with `/` separators, or the absolute
    /// path for files outside the project root.
    pub id: String,
    pub path: PathBuf,
    pub docstring: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub functions: Vec<String>,
    /// Resolved import targets, in declaration order.
    #[serde(default)]
    pub imports: Vec<String>,
    /// Importers, in the order they were discovered.
    #[serde(default)]
    pub imported_by: Vec<String>,
    pub business_purpose: Option<String>,
    #[serde(default)]
    pub role: ArchitecturalRole,
    #[serde(default)]
    pub risk: RiskLevel,
    #[serde(default)]
    pub external_deps: BTreeSet<String>,
    #[serde(default)]
    pub todos: Vec<TodoEntry>,
    pub test_file: Option<String>,
    #[serde(default)]
    pub has_error_handling: bool,
}

/// Output format written by the CLI.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
}

impl OutputFormat {
    pub fn default_output_path(&self) -> &'static str {
        match self {
            Self::Markdown => "dependencies_ext.md",
            Self::Json => "dependencies_ext.json",
        }
    }
}

/// Configuration for a mapping run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    pub entry_file: String,
    #[serde(default)]
    pub root_dir: String,
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_max_depth() -> usize {
    999
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            entry_file: String::new(),
            root_dir: String::new(),
            max_depth: default_max_depth(),
            format: OutputFormat::default(),
        }
    }
}

impl MapConfig {
    /// Configuration for mapping from `entry`. Both paths are canonicalised
    /// so canonical ids come out root-relative however the entry was spelled;
    /// without an explicit root the nearest marked ancestor is used.
    pub fn for_entry(entry: &Path, root: Option<&Path>, max_depth: usize) -> Self {
        let entry = entry.canonicalize().unwrap_or_else(|_| entry.to_path_buf());
        let root = match root {
            Some(root) => root.canonicalize().unwrap_or_else(|_| root.to_path_buf()),
            None => detect_project_root(&entry),
        };
        Self {
            entry_file: entry.to_string_lossy().to_string(),
            root_dir: root.to_string_lossy().to_string(),
            max_depth,
            ..Default::default()
        }
    }

    pub fn entry_path(&self) -> &Path {
        Path::new(&self.entry_file)
    }

    pub fn root_path(&self) -> &Path {
        Path::new(&self.root_dir)
    }

    /// Check the preconditions the traversal relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let entry = self.entry_path();
        if !entry.exists() {
            return Err(ConfigError::EntryNotFound {
                path: self.entry_file.clone(),
            });
        }
        if !entry.is_file() {
            return Err(ConfigError::EntryNotAFile {
                path: self.entry_file.clone(),
            });
        }
        if !self.root_path().is_dir() {
            return Err(ConfigError::RootNotADirectory {
                path: self.root_dir.clone(),
            });
        }
        Ok(())
    }
}

/// Result of a mapping run, matching the JSON output schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapResult {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub stats: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub nodes: Vec<FileNode>,
    #[serde(default)]
    pub edges: Vec<EdgeOutput>,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub cycles: Vec<Vec<String>>,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl Default for MapResult {
    fn default() -> Self {
        Self {
            version: default_version(),
            metadata: BTreeMap::new(),
            stats: BTreeMap::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
            errors: Vec::new(),
            cycles: Vec::new(),
        }
    }
}

/// Import edge in the output JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeOutput {
    pub from: String,
    pub to: String,
}
