//! Rewrite error types.

use std::path::PathBuf;

/// Errors raised while rewriting a single source file.
///
/// All of these leave the file untouched.
#[derive(Debug, thiserror::Error)]
pub enum RewriteError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported source extension: {0}")]
    UnsupportedLanguage(PathBuf),

    #[error("grammar load error: {0}")]
    Grammar(#[from] tree_sitter::LanguageError),

    #[error("parser produced no tree")]
    NoTree,

    #[error("syntax error at {line}:{column}")]
    Syntax { line: usize, column: usize },
}
