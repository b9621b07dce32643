//! Python source analysis on top of tree-sitter.

use std::sync::LazyLock;

use regex::Regex;
use tree_sitter::{Language, Node, Parser, Tree};

use crate::config::ImportStatement;

/// String prefix and opening quote of a Python string literal.
static STRING_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^([A-Za-z]*)("""|'''|"|')"#).unwrap());

/// Structural facet of a module that parsed without syntax errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleStructure {
    pub docstring: Option<String>,
    pub classes: Vec<String>,
    pub functions: Vec<String>,
    pub imports: Vec<ImportStatement>,
    pub has_error_handling: bool,
}

pub struct PythonAnalyser;

impl Default for PythonAnalyser {
    fn default() -> Self {
        Self
    }
}

impl PythonAnalyser {
    pub fn new() -> Self {
        Self
    }

    pub fn get_language(&self) -> Language {
        tree_sitter_python::LANGUAGE.into()
    }

    /// Parse source text. `None` only if the parser could not be set up.
    pub fn parse(&self, source: &str) -> Option<Tree> {
        let mut parser = Parser::new();
        parser.set_language(&self.get_language()).ok()?;
        parser.parse(source, None)
    }

    /// Position (1-based line, 0-based column) of the first syntax error.
    pub fn first_syntax_error(&self, tree: &Tree) -> Option<(usize, usize)> {
        let root = tree.root_node();
        if !root.has_error() {
            return None;
        }
        let mut found = None;
        visit_preorder(root, |node| {
            if found.is_none() && (node.is_error() || node.is_missing()) {
                let pos = node.start_position();
                found = Some((pos.row + 1, pos.column));
            }
        });
        // has_error() guarantees a hit, but keep a position either way.
        found.or(Some((1, 0)))
    }

    /// Full structural facet. Callers check `first_syntax_error` first.
    pub fn extract_structure(&self, tree: &Tree, source: &[u8]) -> ModuleStructure {
        let root = tree.root_node();
        let mut structure = ModuleStructure {
            docstring: Self::module_docstring(&root, source),
            imports: self.extract_imports(tree, source),
            ..Default::default()
        };

        visit_preorder(root, |node| match node.kind() {
            "class_definition" => {
                if let Some(name) = Self::field_text(&node, "name", source) {
                    structure.classes.push(name);
                }
            }
            "function_definition" if node.start_position().column == 0 => {
                if let Some(name) = Self::field_text(&node, "name", source) {
                    structure.functions.push(name);
                }
            }
            "try_statement" => structure.has_error_handling = true,
            _ => {}
        });

        structure
    }

    /// Every import statement in the file, in source order, nested ones included.
    /// Works on trees with syntax errors too; only intact statements are reported.
    pub fn extract_imports(&self, tree: &Tree, source: &[u8]) -> Vec<ImportStatement> {
        let mut imports = Vec::new();
        visit_preorder(tree.root_node(), |node| {
            let specifiers: Vec<String> = match node.kind() {
                "import_statement" => {
                    let mut cursor = node.walk();
                    node.children_by_field_name("name", &mut cursor)
                        .filter_map(|name| {
                            let target = if name.kind() == "aliased_import" {
                                name.child_by_field_name("name")?
                            } else {
                                name
                            };
                            target.utf8_text(source).ok().map(str::to_string)
                        })
                        .collect()
                }
                "import_from_statement" => Self::field_text(&node, "module_name", source)
                    .into_iter()
                    .collect(),
                "future_import_statement" => vec!["__future__".to_string()],
                _ => return,
            };

            let line = node.start_position().row + 1;
            for specifier in specifiers {
                if specifier.is_empty() {
                    continue;
                }
                imports.push(ImportStatement { specifier, line });
            }
        });
        imports
    }

    fn field_text(node: &Node, field: &str, source: &[u8]) -> Option<String> {
        node.child_by_field_name(field)
            .and_then(|n| n.utf8_text(source).ok())
            .map(|s| s.to_string())
    }

    /// Leading string literal of the module, cleaned like `inspect.cleandoc`.
    /// Implicitly concatenated and parenthesised literals count; any bytes or
    /// f-string part disqualifies the whole expression.
    fn module_docstring(root: &Node, source: &[u8]) -> Option<String> {
        let mut cursor = root.walk();
        let first = root
            .named_children(&mut cursor)
            .find(|n| n.kind() != "comment")?;
        if first.kind() != "expression_statement" || first.named_child_count() != 1 {
            return None;
        }
        let mut literal = first.named_child(0)?;
        while literal.kind() == "parenthesized_expression" {
            literal = literal.named_child(0)?;
        }
        let body = match literal.kind() {
            "string" => string_literal_body(literal.utf8_text(source).ok()?)?,
            "concatenated_string" => {
                let mut parts = literal.walk();
                let bodies = literal
                    .named_children(&mut parts)
                    .filter(|part| part.kind() == "string")
                    .map(|part| string_literal_body(part.utf8_text(source).ok()?))
                    .collect::<Option<Vec<_>>>()?;
                bodies.concat()
            }
            _ => return None,
        };
        Some(clean_docstring(&body))
    }
}

/// Pre-order walk over every node below (and including) `root`.
fn visit_preorder<'t>(root: Node<'t>, mut f: impl FnMut(Node<'t>)) {
    let mut cursor = root.walk();
    loop {
        f(cursor.node());
        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}

/// Contents of a plain (non-bytes, non-f) string literal, escapes decoded
/// unless the literal is raw.
fn string_literal_body(raw: &str) -> Option<String> {
    let caps = STRING_LITERAL.captures(raw)?;
    let prefix = caps.get(1).map(|m| m.as_str().to_ascii_lowercase())?;
    let quote = caps.get(2)?.as_str();
    if prefix.contains('b') || prefix.contains('f') || prefix.contains('t') {
        return None;
    }
    let start = prefix.len() + quote.len();
    let end = raw.len().checked_sub(quote.len())?;
    if end < start || !raw.get(end..)?.starts_with(quote) {
        return None;
    }
    let body = raw.get(start..end)?;
    if prefix.contains('r') {
        Some(body.to_string())
    } else {
        Some(unescape(body))
    }
}

/// Decode the common backslash escapes; unknown escapes are kept verbatim.
fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some('\n') => {}
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Same normalisation as Python's `inspect.cleandoc`.
fn clean_docstring(doc: &str) -> String {
    let expanded = expand_tabs(doc);
    let lines: Vec<&str> = expanded.split('\n').collect();

    let margin = lines
        .iter()
        .skip(1)
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut cleaned: Vec<String> = Vec::with_capacity(lines.len());
    for (i, line) in lines.iter().enumerate() {
        if i == 0 {
            cleaned.push(line.trim_start().to_string());
        } else if line.len() >= margin && line.is_char_boundary(margin) {
            cleaned.push(line[margin..].to_string());
        } else {
            cleaned.push(line.trim_start().to_string());
        }
    }

    while cleaned.last().is_some_and(|l| l.trim().is_empty()) {
        cleaned.pop();
    }
    let leading = cleaned.iter().take_while(|l| l.trim().is_empty()).count();
    cleaned.drain(..leading);
    cleaned.join("\n")
}

fn expand_tabs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut column = 0;
    for c in text.chars() {
        match c {
            '\t' => {
                let pad = 8 - column % 8;
                out.extend(std::iter::repeat(' ').take(pad));
                column += pad;
            }
            '\n' => {
                out.push(c);
                column = 0;
            }
            _ => {
                out.push(c);
                column += 1;
            }
        }
    }
    out
}
