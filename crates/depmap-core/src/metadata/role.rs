//! Architectural role detection from path and file-name conventions.

use crate::config::ArchitecturalRole;

#[derive(Debug, Clone, Copy)]
enum RolePattern {
    PathContains(&'static str),
    FileNameContains(&'static str),
    FileNameStartsWith(&'static str),
    FileNameEndsWith(&'static str),
}

impl RolePattern {
    fn matches(&self, path: &str, file_name: &str) -> bool {
        match self {
            Self::PathContains(s) => path.contains(s),
            Self::FileNameContains(s) => file_name.contains(s),
            Self::FileNameStartsWith(s) => file_name.starts_with(s),
            Self::FileNameEndsWith(s) => file_name.ends_with(s),
        }
    }
}

/// Priority order matters: the first rule with any matching pattern wins.
const ROLE_RULES: &[(ArchitecturalRole, &[RolePattern])] = &[
    (
        ArchitecturalRole::Controller,
        &[
            RolePattern::PathContains("controller"),
            RolePattern::FileNameEndsWith("_controller.py"),
        ],
    ),
    (
        ArchitecturalRole::Model,
        &[
            RolePattern::PathContains("model"),
            RolePattern::FileNameEndsWith("_model.py"),
        ],
    ),
    (
        ArchitecturalRole::View,
        &[
            RolePattern::PathContains("view"),
            RolePattern::FileNameEndsWith("_view.py"),
        ],
    ),
    (
        ArchitecturalRole::Utility,
        &[
            RolePattern::PathContains("util"),
            RolePattern::PathContains("helper"),
        ],
    ),
    (
        ArchitecturalRole::Configuration,
        &[RolePattern::FileNameContains("config")],
    ),
    (
        ArchitecturalRole::Test,
        &[
            RolePattern::PathContains("test"),
            RolePattern::FileNameStartsWith("test_"),
        ],
    ),
    (
        ArchitecturalRole::PackageInitializer,
        &[RolePattern::FileNameContains("__init__.py")],
    ),
];

/// Detect the role of a file from its canonical id.
pub fn detect_role(canonical_id: &str) -> ArchitecturalRole {
    let path = canonical_id.to_lowercase().replace('\\', "/");
    let file_name = path.rsplit('/').next().unwrap_or(&path).to_string();

    ROLE_RULES
        .iter()
        .find(|(_, patterns)| patterns.iter().any(|p| p.matches(&path, &file_name)))
        .map(|(role, _)| *role)
        .unwrap_or(ArchitecturalRole::Other)
}
