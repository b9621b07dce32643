//! Markdown rendering of a dependency graph.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::path::Path;
use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;

use crate::config::{FileNode, RiskLevel};
use crate::graph::DependencyGraph;

static ANCHOR_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[/._]").unwrap());

const MAX_LISTED_DEPS: usize = 10;
const MAX_LISTED_CLASSES: usize = 5;
const MAX_LISTED_FUNCTIONS: usize = 5;
const MAX_LISTED_TODOS: usize = 10;

/// Run details shown in the report header.
#[derive(Debug, Clone)]
pub struct ReportContext {
    /// Canonical id of the entry file.
    pub entry: String,
    pub root_dir: String,
    pub max_depth: usize,
}

/// In-page anchor for a canonical id.
pub fn anchor(id: &str) -> String {
    ANCHOR_CHARS.replace_all(id, "-").into_owned()
}

/// Comma-separated list capped at `limit`, with a "+N more" tail.
fn capped_list(items: &[String], limit: usize, fmt: impl Fn(&str) -> String) -> String {
    let mut out = items
        .iter()
        .take(limit)
        .map(|s| fmt(s))
        .collect::<Vec<_>>()
        .join(", ");
    if items.len() > limit {
        let _ = write!(out, " ... +{} more", items.len() - limit);
    }
    out
}

/// Render the full Markdown report.
pub fn render_markdown(graph: &DependencyGraph, ctx: &ReportContext) -> String {
    let mut out = String::new();
    let nodes = graph.sorted_nodes();

    let _ = writeln!(out, "# 📊 Dependency Map (Extended)\n");
    let _ = writeln!(out, "**Entry point:** [{0}]({0})", ctx.entry);
    let _ = writeln!(out, "**Root directory:** `{}`", ctx.root_dir);
    let _ = writeln!(out, "**Max depth:** {}", ctx.max_depth);
    let _ = writeln!(out, "**Files analyzed:** {}", graph.node_count());
    let _ = writeln!(out, "**Generated:** {}", Utc::now().format("%Y-%m-%d %H:%M:%S UTC"));
    out.push_str("\n---\n\n");

    out.push_str("## 📑 Table of Contents\n\n");
    for node in &nodes {
        let _ = writeln!(
            out,
            "- [ ] {} [{}](#{})",
            node.risk.emoji(),
            node.id,
            anchor(&node.id)
        );
    }
    out.push_str("\n---\n\n");

    out.push_str("## 🌲 Dependency Tree\n\n```\n");
    let mut visited = HashSet::new();
    render_tree(graph, &ctx.entry, &mut out, &mut visited, "", true);
    out.push_str("```\n\n---\n\n");

    out.push_str("## 📄 File Details\n\n");
    for node in &nodes {
        render_node(graph, node, &mut out);
    }

    if !graph.errors().is_empty() {
        out.push_str("## ⚠️ Import Errors\n\n");
        for error in graph.errors() {
            let _ = writeln!(out, "- {error}");
        }
        out.push('\n');
    }

    let cycles = graph.import_cycles();
    if !cycles.is_empty() {
        out.push_str("## 🔁 Import Cycles\n\n");
        for cycle in &cycles {
            let _ = writeln!(out, "- {}", cycle.join(" ↔ "));
        }
        out.push('\n');
    }

    render_summary(graph, &mut out);
    out
}

fn render_node(graph: &DependencyGraph, node: &FileNode, out: &mut String) {
    let _ = writeln!(out, "### {} {{#{}}}\n", node.id, anchor(&node.id));
    let _ = writeln!(out, "**Path:** [{0}]({0})\n", node.id);

    if let Some(purpose) = &node.business_purpose {
        let _ = writeln!(out, "**Business Purpose:** {purpose}\n");
    }
    let _ = writeln!(out, "**Architectural Role:** {}\n", node.role);

    let _ = writeln!(out, "**Risk Level:** {} {}", node.risk.emoji(), node.risk);
    if node.has_error_handling {
        out.push_str("*(Has error handling: try/except blocks)*\n");
    }
    out.push('\n');

    if let Some(doc) = &node.docstring {
        let first_line = doc.lines().next().unwrap_or("").trim();
        if !first_line.is_empty() && Some(first_line) != node.business_purpose.as_deref() {
            let _ = writeln!(out, "**Description:** {first_line}\n");
        }
    }

    if !node.external_deps.is_empty() {
        let deps: Vec<String> = node.external_deps.iter().cloned().collect();
        let _ = writeln!(
            out,
            "**External Dependencies:** {}\n",
            capped_list(&deps, MAX_LISTED_DEPS, |d| format!("`{d}`"))
        );
    }

    if !node.classes.is_empty() {
        let _ = writeln!(
            out,
            "**Classes:** {}\n",
            capped_list(&node.classes, MAX_LISTED_CLASSES, |c| format!("`{c}`"))
        );
    }

    if !node.functions.is_empty() {
        let _ = writeln!(
            out,
            "**Functions:** {}\n",
            capped_list(&node.functions, MAX_LISTED_FUNCTIONS, |f| format!("`{f}()`"))
        );
    }

    if !node.todos.is_empty() {
        out.push_str("**🚨 TODOs/Issues:**\n");
        for todo in node.todos.iter().take(MAX_LISTED_TODOS) {
            let _ = writeln!(out, "- {todo}");
        }
        if node.todos.len() > MAX_LISTED_TODOS {
            let _ = writeln!(out, "- ... +{} more", node.todos.len() - MAX_LISTED_TODOS);
        }
        out.push('\n');
    }

    if let Some(test_file) = &node.test_file {
        let _ = writeln!(out, "**Test File:** ✅ [{}](#{})\n", test_file, anchor(test_file));
    }

    if !node.imports.is_empty() {
        out.push_str("**Imports:**\n");
        let mut imports: Vec<&String> = node.imports.iter().collect();
        imports.sort();
        for imp in imports {
            match graph.get(imp) {
                Some(target) => {
                    let _ = writeln!(out, "- [ ] {} [{}](#{})", target.risk.emoji(), imp, anchor(imp));
                }
                None => {
                    let _ = writeln!(out, "- [ ] [{}](#{})", imp, anchor(imp));
                }
            }
        }
        out.push('\n');
    }

    if !node.imported_by.is_empty() {
        out.push_str("**Imported by:**\n");
        let mut importers: Vec<&String> = node.imported_by.iter().collect();
        importers.sort();
        for imp in importers {
            let _ = writeln!(out, "- [ ] [{}](#{})", imp, anchor(imp));
        }
        out.push('\n');
    }

    out.push_str("---\n\n");
}

/// ASCII tree of first-seen imports; files already drawn are skipped.
fn render_tree(
    graph: &DependencyGraph,
    id: &str,
    out: &mut String,
    visited: &mut HashSet<String>,
    prefix: &str,
    is_last: bool,
) {
    if visited.contains(id) {
        return;
    }
    let Some(node) = graph.get(id) else {
        return;
    };
    visited.insert(id.to_string());

    let branch = if is_last { "└── " } else { "├── " };
    let _ = writeln!(out, "{prefix}{branch}{id}");

    let child_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
    let children: Vec<&String> = node
        .imports
        .iter()
        .filter(|imp| !visited.contains(imp.as_str()))
        .collect();
    let count = children.len();
    for (i, child) in children.into_iter().enumerate() {
        render_tree(graph, child, out, visited, &child_prefix, i + 1 == count);
    }
}

fn render_summary(graph: &DependencyGraph, out: &mut String) {
    out.push_str("## 📊 Summary Statistics\n\n");

    let risk = graph.risk_distribution();
    out.push_str("**Risk Distribution:**\n");
    for level in [RiskLevel::High, RiskLevel::Medium, RiskLevel::Low, RiskLevel::Unknown] {
        let count = risk.get(&level).copied().unwrap_or(0);
        if level == RiskLevel::Unknown && count == 0 {
            continue;
        }
        let _ = writeln!(out, "- {} {}: {} files", level.emoji(), level, count);
    }
    out.push('\n');

    let mut roles: Vec<_> = graph.role_distribution().into_iter().collect();
    roles.sort_by(|a, b| b.1.cmp(&a.1));
    out.push_str("**Architectural Distribution:**\n");
    for (role, count) in roles {
        let _ = writeln!(out, "- {role}: {count} files");
    }
    out.push('\n');

    let deps = graph.external_dependencies();
    if !deps.is_empty() {
        let listed: Vec<String> = deps.iter().map(|d| format!("`{d}`")).collect();
        let _ = writeln!(out, "**All External Dependencies:** {}\n", listed.join(", "));
    }
}

/// Write a rendered report, creating parent directories.
pub fn write_markdown(markdown: &str, output_path: &str) -> std::io::Result<()> {
    if let Some(parent) = Path::new(output_path).parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output_path, markdown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ArchitecturalRole, TodoEntry};
    use std::collections::BTreeSet;
    use std::path::PathBuf;

    fn node(id: &str) -> FileNode {
        FileNode {
            id: id.to_string(),
            path: PathBuf::from(id),
            docstring: None,
            classes: Vec::new(),
            functions: Vec::new(),
            imports: Vec::new(),
            imported_by: Vec::new(),
            business_purpose: None,
            role: ArchitecturalRole::Other,
            risk: RiskLevel::Low,
            external_deps: BTreeSet::new(),
            todos: Vec::new(),
            test_file: None,
            has_error_handling: false,
        }
    }

    fn ctx() -> ReportContext {
        ReportContext {
            entry: "main.py".to_string(),
            root_dir: "/repo".to_string(),
            max_depth: 999,
        }
    }

    #[test]
    fn anchors_replace_separators() {
        assert_eq!(anchor("pkg/sub_mod.py"), "pkg-sub-mod-py");
    }

    #[test]
    fn capped_list_adds_tail() {
        let items: Vec<String> = (1..=7).map(|i| format!("C{i}")).collect();
        assert_eq!(
            capped_list(&items, 5, |c| format!("`{c}`")),
            "`C1`, `C2`, `C3`, `C4`, `C5` ... +2 more"
        );
    }

    #[test]
    fn renders_tree_and_sections() {
        let mut graph = DependencyGraph::new();
        let mut main = node("main.py");
        main.business_purpose = Some("Entry point.".to_string());
        main.docstring = Some("Entry point.".to_string());
        main.classes = vec!["App".to_string()];
        graph.add_node(main);

        let mut svc = node("pkg/service.py");
        svc.risk = RiskLevel::High;
        svc.todos.push(TodoEntry {
            line: 3,
            marker: "TODO".to_string(),
            text: "TODO: retry".to_string(),
        });
        svc.external_deps.insert("requests".to_string());
        graph.add_node(svc);
        graph.add_node(node("pkg/util.py"));

        graph.add_import("main.py", "pkg/service.py");
        graph.add_back_edge("main.py", "pkg/service.py");
        graph.add_import("main.py", "pkg/util.py");
        graph.record_error("main.py: unresolved import 'yaml' (line 2)");

        let md = render_markdown(&graph, &ctx());

        assert!(md.contains("**Files analyzed:** 3"));
        assert!(md.contains("└── main.py\n    ├── pkg/service.py\n    └── pkg/util.py\n"));
        assert!(md.contains("- [ ] 🔴 [pkg/service.py](#pkg-service-py)"));
        assert!(md.contains("**Business Purpose:** Entry point."));
        assert!(!md.contains("**Description:**"));
        assert!(md.contains("- Line 3: TODO: retry"));
        assert!(md.contains("**Imported by:**\n- [ ] [main.py](#main-py)"));
        assert!(md.contains("## ⚠️ Import Errors"));
        assert!(md.contains("- 🔴 HIGH: 1 files"));
        assert!(md.contains("**All External Dependencies:** `requests`"));
        assert!(!md.contains("Import Cycles"));
    }

    #[test]
    fn tree_survives_cycles() {
        let mut graph = DependencyGraph::new();
        graph.add_node(node("main.py"));
        graph.add_node(node("a.py"));
        graph.add_import("main.py", "a.py");
        graph.add_import("a.py", "main.py");
        graph.add_back_edge("main.py", "a.py");
        graph.add_back_edge("a.py", "main.py");

        let md = render_markdown(&graph, &ctx());
        assert!(md.contains("└── main.py\n    └── a.py\n```"));
        assert!(md.contains("## 🔁 Import Cycles\n\n- a.py ↔ main.py"));
    }

    #[test]
    fn write_markdown_to_nested_path() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("docs/deps.md");
        write_markdown("# hi\n", &out.to_string_lossy()).unwrap();
        assert_eq!(std::fs::read_to_string(out).unwrap(), "# hi\n");
    }
}
