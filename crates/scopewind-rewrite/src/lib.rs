//! Namespace-scoped class rewriting for JSX/TSX sources.
//!
//! Given the renames recorded for one namespace (`primary -> shop-primary`),
//! the rewriter finds every class list in a source file's markup attributes
//! and replaces the matching class tokens, leaving the rest of the file
//! byte-identical.

mod class_list;
mod error;
mod rewriter;
mod rules;
mod syntax;

pub use class_list::{rewrite_class_list, ObservedClasses, SegmentEdges};
pub use error::RewriteError;
pub use rewriter::{
    is_identifier, rewrite_file, rewrite_source, RewriteOptions, SourceRewrite,
    DEFAULT_CLASS_ATTRIBUTES, DEFAULT_CLASS_HELPERS,
};
pub use rules::{ScopePair, ScopeRules};
pub use syntax::SourceLanguage;
