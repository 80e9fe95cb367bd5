//! tree-sitter front end for JavaScript, JSX and TypeScript sources.

use std::path::Path;

use tree_sitter::{Language, Node, Parser, Tree};

use crate::error::RewriteError;

/// Grammar used to parse a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLanguage {
    /// JavaScript with JSX.
    JavaScript,
    /// Plain TypeScript (no JSX).
    TypeScript,
    /// TypeScript with JSX.
    Tsx,
}

impl SourceLanguage {
    /// Pick the grammar from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        match ext {
            "js" | "jsx" | "mjs" | "cjs" => Some(SourceLanguage::JavaScript),
            "ts" | "mts" | "cts" => Some(SourceLanguage::TypeScript),
            "tsx" => Some(SourceLanguage::Tsx),
            _ => None,
        }
    }

    fn grammar(self) -> Language {
        match self {
            SourceLanguage::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            SourceLanguage::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            SourceLanguage::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

/// Parse `source`, rejecting trees that contain error or missing nodes.
pub fn parse(source: &str, language: SourceLanguage) -> Result<Tree, RewriteError> {
    let mut parser = Parser::new();
    parser.set_language(&language.grammar())?;
    let tree = parser.parse(source, None).ok_or(RewriteError::NoTree)?;

    if tree.root_node().has_error() {
        let at = first_error(tree.root_node()).unwrap_or(tree.root_node());
        let pos = at.start_position();
        return Err(RewriteError::Syntax {
            line: pos.row + 1,
            column: pos.column + 1,
        });
    }

    Ok(tree)
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|child| child.has_error())
        .find_map(first_error)
}

/// Source text of a node.
pub fn node_text<'a>(node: Node, src: &'a str) -> &'a str {
    &src[node.start_byte()..node.end_byte()]
}
