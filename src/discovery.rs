//! Source file discovery under the pages root.

use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};
use walkdir::WalkDir;

/// Default source pattern, relative to the pages root
pub const DEFAULT_PATTERN: &str = "**/index.{jsx,tsx}";

#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("invalid source pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

/// Compile a source pattern. `*` does not cross directory separators.
pub fn compile_pattern(pattern: &str) -> Result<GlobMatcher, DiscoveryError> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|source| DiscoveryError::Pattern {
            pattern: pattern.to_string(),
            source,
        })
}

/// Every file under `root` whose root-relative path matches `pattern`,
/// sorted. A missing root yields no files.
pub fn discover_sources(root: &Path, pattern: &str) -> Result<Vec<PathBuf>, DiscoveryError> {
    let matcher = compile_pattern(pattern)?;

    if !root.is_dir() {
        tracing::warn!(root = %root.display(), "pages directory does not exist");
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("skipping unreadable path: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let relative = relative.to_string_lossy().replace('\\', "/");
        if matcher.is_match(relative.as_str()) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_default_pattern() {
        let matcher = compile_pattern(DEFAULT_PATTERN).unwrap();
        assert!(matcher.is_match("home/index.jsx"));
        assert!(matcher.is_match("a/b/index.tsx"));
        assert!(matcher.is_match("index.jsx"));
        assert!(!matcher.is_match("home/index.js"));
        assert!(!matcher.is_match("home/page.jsx"));
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(matches!(
            compile_pattern("**/{a,b"),
            Err(DiscoveryError::Pattern { .. })
        ));
    }

    #[test]
    fn test_discover_sources() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "shop/index.jsx");
        touch(dir.path(), "blog/index.tsx");
        touch(dir.path(), "blog/Card.tsx");
        touch(dir.path(), "blog/nested/index.jsx");
        touch(dir.path(), "styles.css");

        let files = discover_sources(dir.path(), DEFAULT_PATTERN).unwrap();
        let rel: Vec<String> = files
            .iter()
            .map(|f| {
                f.strip_prefix(dir.path())
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect();
        assert_eq!(
            rel,
            vec!["blog/index.tsx", "blog/nested/index.jsx", "shop/index.jsx"]
        );
    }

    #[test]
    fn test_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let files = discover_sources(&dir.path().join("pages"), DEFAULT_PATTERN).unwrap();
        assert!(files.is_empty());
    }
}
