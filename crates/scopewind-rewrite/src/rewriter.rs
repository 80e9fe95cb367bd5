//! Class-attribute rewriting for a whole source file.
//!
//! The file is parsed with tree-sitter, every class-list attribute is located,
//! and the matching string contents are replaced through byte-range edits
//! spliced into the original text. Code outside those ranges is copied
//! through verbatim.
//!
//! Covered attribute value shapes:
//!
//! - `className="..."` and `className={"..."}`
//! - template strings: each static segment, interpolations untouched
//! - conditionals: branches that are string literals
//! - helper calls (`clsx(...)`, `classnames(...)`): string arguments, plus
//!   string, identifier and shorthand keys of object arguments
//!
//! Wrapping parentheses around any of these are looked through.
//! Anything else is left alone.

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex_lite::Regex;
use tree_sitter::Node;

use crate::class_list::{rewrite_class_list, ObservedClasses, SegmentEdges};
use crate::error::RewriteError;
use crate::rules::ScopeRules;
use crate::syntax::{node_text, parse, SourceLanguage};

/// Attributes holding a class list.
pub const DEFAULT_CLASS_ATTRIBUTES: &[&str] = &["className"];

/// Helper functions whose arguments are class lists.
pub const DEFAULT_CLASS_HELPERS: &[&str] = &["clsx", "classnames"];

/// Options for the source rewriter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOptions {
    /// JSX attribute names to rewrite
    pub attributes: Vec<String>,
    /// Call names treated as class-list helpers
    pub helpers: Vec<String>,
    /// Compute the rewrite without writing the file
    pub dry_run: bool,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            attributes: DEFAULT_CLASS_ATTRIBUTES.iter().map(|s| s.to_string()).collect(),
            helpers: DEFAULT_CLASS_HELPERS.iter().map(|s| s.to_string()).collect(),
            dry_run: false,
        }
    }
}

impl RewriteOptions {
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Result of rewriting one source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRewrite {
    /// Rewritten source text
    pub output: String,
    /// Whether `output` differs from the input
    pub changed: bool,
    /// Number of byte-range edits that altered the text
    pub edits: usize,
    /// Class tokens seen in class-list positions
    pub observed: ObservedClasses,
}

/// A byte-range replacement in the original source.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Edit {
    start: usize,
    end: usize,
    text: String,
}

fn identifier_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("identifier pattern is valid"))
}

/// Whether `name` can be written as a bare object key.
pub fn is_identifier(name: &str) -> bool {
    identifier_pattern().is_match(name)
}

/// Rewrite the class lists in `source`.
pub fn rewrite_source(
    source: &str,
    language: SourceLanguage,
    rules: &ScopeRules,
    options: &RewriteOptions,
) -> Result<SourceRewrite, RewriteError> {
    let tree = parse(source, language)?;
    let mut collector = EditCollector {
        src: source,
        rules,
        options,
        edits: Vec::new(),
        observed: ObservedClasses::new(),
    };
    collector.visit(tree.root_node());

    let EditCollector {
        mut edits, observed, ..
    } = collector;
    edits.sort_by_key(|e| e.start);

    let mut output = String::with_capacity(source.len());
    let mut cursor = 0;
    for edit in &edits {
        output.push_str(&source[cursor..edit.start]);
        output.push_str(&edit.text);
        cursor = edit.end;
    }
    output.push_str(&source[cursor..]);

    Ok(SourceRewrite {
        changed: output != source,
        output,
        edits: edits.len(),
        observed,
    })
}

/// Rewrite a file in place.
///
/// Returns `Ok(None)` without touching anything when there are no rules or
/// the file does not exist. The file is written only when its text changed
/// and `options.dry_run` is off.
pub fn rewrite_file(
    path: &Path,
    rules: &ScopeRules,
    options: &RewriteOptions,
) -> Result<Option<SourceRewrite>, RewriteError> {
    if rules.is_empty() || !path.exists() {
        return Ok(None);
    }

    let language = SourceLanguage::from_path(path)
        .ok_or_else(|| RewriteError::UnsupportedLanguage(path.to_path_buf()))?;
    let source = fs::read_to_string(path).map_err(|source| RewriteError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let rewrite = rewrite_source(&source, language, rules, options)?;

    if rewrite.changed {
        if options.dry_run {
            tracing::debug!(path = %path.display(), "[dry-run] would update");
        } else {
            fs::write(path, &rewrite.output).map_err(|source| RewriteError::Write {
                path: path.to_path_buf(),
                source,
            })?;
            tracing::debug!(path = %path.display(), edits = rewrite.edits, "updated");
        }
    }

    Ok(Some(rewrite))
}

/// The expression inside any number of wrapping parentheses.
fn strip_parens(mut node: Node) -> Node {
    while node.kind() == "parenthesized_expression" {
        let mut cursor = node.walk();
        let inner = node
            .named_children(&mut cursor)
            .find(|child| child.kind() != "comment");
        match inner {
            Some(inner) => node = inner,
            None => break,
        }
    }
    node
}

struct EditCollector<'a> {
    src: &'a str,
    rules: &'a ScopeRules,
    options: &'a RewriteOptions,
    edits: Vec<Edit>,
    observed: ObservedClasses,
}

impl<'a> EditCollector<'a> {
    fn visit(&mut self, root: Node<'a>) {
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if node.kind() == "jsx_attribute" && self.is_class_attribute(node) {
                if let Some(value) = node.named_child(1) {
                    self.attribute_value(value);
                }
                continue;
            }
            let mut cursor = node.walk();
            let children: Vec<Node<'a>> = node.named_children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }
    }

    fn is_class_attribute(&self, attribute: Node) -> bool {
        attribute
            .named_child(0)
            .filter(|name| name.kind() == "property_identifier")
            .map(|name| {
                let name = node_text(name, self.src);
                self.options.attributes.iter().any(|a| a == name)
            })
            .unwrap_or(false)
    }

    fn attribute_value(&mut self, value: Node) {
        match value.kind() {
            "string" => self.string_literal(value),
            "jsx_expression" => {
                if let Some(expression) = value.named_child(0) {
                    self.expression(expression);
                }
            }
            _ => {}
        }
    }

    fn expression(&mut self, expression: Node) {
        let expression = strip_parens(expression);
        match expression.kind() {
            "string" => self.string_literal(expression),
            "template_string" => self.template_string(expression),
            "ternary_expression" => {
                for field in ["consequence", "alternative"] {
                    if let Some(branch) = expression.child_by_field_name(field) {
                        let branch = strip_parens(branch);
                        if branch.kind() == "string" {
                            self.string_literal(branch);
                        }
                    }
                }
            }
            "call_expression" => self.helper_call(expression),
            _ => {}
        }
    }

    fn helper_call(&mut self, call: Node) {
        let is_helper = call
            .child_by_field_name("function")
            .filter(|f| f.kind() == "identifier")
            .map(|f| {
                let name = node_text(f, self.src);
                self.options.helpers.iter().any(|h| h == name)
            })
            .unwrap_or(false);
        if !is_helper {
            return;
        }
        let Some(arguments) = call.child_by_field_name("arguments") else {
            return;
        };

        let mut cursor = arguments.walk();
        let args: Vec<Node> = arguments.named_children(&mut cursor).collect();
        for arg in args {
            match arg.kind() {
                "string" => self.string_literal(arg),
                "object" => self.object_keys(arg),
                _ => {}
            }
        }
    }

    fn object_keys(&mut self, object: Node) {
        let mut cursor = object.walk();
        let members: Vec<Node> = object.named_children(&mut cursor).collect();
        for member in members {
            match member.kind() {
                "pair" => {
                    let Some(key) = member.child_by_field_name("key") else {
                        continue;
                    };
                    match key.kind() {
                        "string" => self.string_literal(key),
                        "property_identifier" => self.identifier_key(key, false),
                        _ => {}
                    }
                }
                "shorthand_property_identifier" => self.identifier_key(member, true),
                _ => {}
            }
        }
    }

    /// Rename an identifier key, quoting it when the new name is not a valid
    /// identifier. A shorthand `{ name }` keeps its value binding.
    fn identifier_key(&mut self, key: Node, shorthand: bool) {
        let name = node_text(key, self.src);
        let Some(renamed) = self.rules.apply(name) else {
            self.observed.classes.insert(name.to_string());
            return;
        };
        self.observed.classes.insert(renamed.clone());

        let written_key = if is_identifier(&renamed) {
            renamed
        } else {
            format!("\"{}\"", renamed)
        };
        let text = if shorthand {
            format!("{}: {}", written_key, name)
        } else {
            written_key
        };
        self.push_edit(key.start_byte(), key.end_byte(), text);
    }

    fn string_literal(&mut self, literal: Node) {
        let (start, end) = (literal.start_byte(), literal.end_byte());
        if end < start + 2 {
            return;
        }
        self.segment(start + 1, end - 1, SegmentEdges::CLOSED);
    }

    fn template_string(&mut self, template: Node) {
        let content_start = template.start_byte() + 1;
        let content_end = template.end_byte().saturating_sub(1);
        if content_end < content_start {
            return;
        }

        let mut cursor = template.walk();
        let substitutions: Vec<(usize, usize)> = template
            .named_children(&mut cursor)
            .filter(|child| child.kind() == "template_substitution")
            .map(|child| (child.start_byte(), child.end_byte()))
            .collect();

        let mut seg_start = content_start;
        for (sub_start, sub_end) in substitutions {
            let edges = SegmentEdges {
                open_start: seg_start != content_start,
                open_end: true,
            };
            self.segment(seg_start, sub_start, edges);
            seg_start = sub_end;
        }
        let edges = SegmentEdges {
            open_start: seg_start != content_start,
            open_end: false,
        };
        self.segment(seg_start, content_end, edges);
    }

    fn segment(&mut self, start: usize, end: usize, edges: SegmentEdges) {
        if start >= end {
            return;
        }
        let original = &self.src[start..end];
        let rewritten = rewrite_class_list(original, self.rules, edges, &mut self.observed);
        if rewritten != original {
            self.push_edit(start, end, rewritten);
        }
    }

    fn push_edit(&mut self, start: usize, end: usize, text: String) {
        self.edits.push(Edit { start, end, text });
    }
}
