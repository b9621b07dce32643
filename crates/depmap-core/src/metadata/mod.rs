//! Per-file metadata: a structural facet from the parse tree plus heuristic
//! facets computed from raw text and file-system conventions.
//!
//! Extraction never fails as a whole. Read, decode and syntax problems are
//! returned in [`FileFacets::errors`] and only blank out the facets that
//! depend on the missing input.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::{ArchitecturalRole, FileNode, ImportStatement, RiskLevel, TodoEntry};
use crate::error::ExtractError;
use crate::languages::python::{ModuleStructure, PythonAnalyser};

pub mod external;
pub mod markers;
pub mod risk;
pub mod role;
pub mod test_link;

/// Everything extracted from one file.
#[derive(Debug, Default)]
pub struct FileFacets {
    pub structure: ModuleStructure,
    pub business_purpose: Option<String>,
    pub role: ArchitecturalRole,
    pub risk: RiskLevel,
    pub external_deps: BTreeSet<String>,
    pub todos: Vec<TodoEntry>,
    pub test_file: Option<String>,
    pub errors: Vec<ExtractError>,
}

impl FileFacets {
    /// Declared imports to follow. Empty when the structural parse failed.
    pub fn imports(&self) -> &[ImportStatement] {
        &self.structure.imports
    }

    /// Build the graph node. Edge lists start empty and are filled by the builder.
    pub fn into_node(self, id: String, path: PathBuf) -> FileNode {
        FileNode {
            id,
            path,
            docstring: self.structure.docstring,
            classes: self.structure.classes,
            functions: self.structure.functions,
            imports: Vec::new(),
            imported_by: Vec::new(),
            business_purpose: self.business_purpose,
            role: self.role,
            risk: self.risk,
            external_deps: self.external_deps,
            todos: self.todos,
            test_file: self.test_file,
            has_error_handling: self.structure.has_error_handling,
        }
    }
}

/// First non-blank docstring line.
pub fn business_purpose(docstring: Option<&str>) -> Option<String> {
    docstring?
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string)
}

pub struct MetadataExtractor {
    root: PathBuf,
    analyser: PythonAnalyser,
}

impl MetadataExtractor {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            analyser: PythonAnalyser::new(),
        }
    }

    pub fn extract(&self, path: &Path, canonical_id: &str) -> FileFacets {
        let mut facets = FileFacets {
            role: role::detect_role(canonical_id),
            test_file: test_link::find_test_file(&self.root, path),
            ..Default::default()
        };

        let content = match read_source(path) {
            Ok(content) => content,
            Err(err) => {
                facets.risk = risk::assess_risk(None).level;
                facets.errors.push(err);
                return facets;
            }
        };

        let assessment = risk::assess_risk(Some(&content));
        if let Some(keyword) = assessment.keyword {
            debug!("{}: {} risk, matched '{}'", canonical_id, assessment.level, keyword);
        }
        facets.risk = assessment.level;
        facets.todos = markers::extract_todos(&content);

        let Some(tree) = self.analyser.parse(&content) else {
            facets.errors.push(ExtractError::Parse);
            return facets;
        };

        if let Some((line, column)) = self.analyser.first_syntax_error(&tree) {
            let imports = self.analyser.extract_imports(&tree, content.as_bytes());
            facets.external_deps = external::external_dependencies(&imports, &self.root);
            facets.errors.push(ExtractError::Syntax { line, column });
            return facets;
        }

        let structure = self.analyser.extract_structure(&tree, content.as_bytes());
        facets.external_deps = external::external_dependencies(&structure.imports, &self.root);
        facets.business_purpose = business_purpose(structure.docstring.as_deref());
        facets.structure = structure;
        facets
    }
}

fn read_source(path: &Path) -> Result<String, ExtractError> {
    let bytes = std::fs::read(path)?;
    String::from_utf8(bytes).map_err(|e| ExtractError::Decode {
        offset: e.utf8_error().valid_up_to(),
    })
}
