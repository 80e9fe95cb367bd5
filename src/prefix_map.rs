//! Page -> namespace mapping (`prefix-map.json`)
//!
//! Loading is best effort: a missing file is an empty map, a malformed one
//! is logged and also treated as empty.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

/// File name of the prefix map inside the config directory
pub const PREFIX_MAP_FILE: &str = "prefix-map.json";

#[derive(Debug, thiserror::Error)]
pub enum PrefixMapError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid prefix map: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("prefix map must be a JSON object")]
    NotAnObject,
}

/// Page directory name -> owning namespace key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixMap {
    entries: BTreeMap<String, String>,
}

impl PrefixMap {
    /// Load the map, falling back to an empty map on any failure.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(map) => map,
            Err(e) => {
                tracing::error!("Failed to load prefix map {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load the map. A missing file is an empty map, not an error.
    pub fn try_load(path: &Path) -> Result<Self, PrefixMapError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| PrefixMapError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse a JSON object of string values; non-string values are ignored.
    pub fn parse(content: &str) -> Result<Self, PrefixMapError> {
        let value: Value = serde_json::from_str(content)?;
        let object = value.as_object().ok_or(PrefixMapError::NotAnObject)?;
        let entries = object
            .iter()
            .filter_map(|(page, ns)| ns.as_str().map(|ns| (page.clone(), ns.to_string())))
            .collect();
        Ok(Self { entries })
    }

    pub fn insert(&mut self, page: impl Into<String>, namespace: impl Into<String>) {
        self.entries.insert(page.into(), namespace.into());
    }

    /// Namespace for a page directory name.
    pub fn namespace_for(&self, page: &str) -> Option<&str> {
        self.entries.get(page).map(|s| s.as_str())
    }

    /// Namespace for a source file, keyed by its parent directory name.
    pub fn namespace_for_file(&self, file: &Path) -> Option<&str> {
        let page = file.parent()?.file_name()?.to_str()?;
        self.namespace_for(page)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let map = PrefixMap::parse(r#"{"home": "shop", "news": "blog", "bad": 3}"#).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.namespace_for("home"), Some("shop"));
        assert_eq!(map.namespace_for("bad"), None);
    }

    #[test]
    fn test_parse_rejects_non_object() {
        assert!(matches!(
            PrefixMap::parse("[]"),
            Err(PrefixMapError::NotAnObject)
        ));
        assert!(matches!(PrefixMap::parse("{"), Err(PrefixMapError::Parse(_))));
    }

    #[test]
    fn test_namespace_for_file() {
        let mut map = PrefixMap::default();
        map.insert("home", "shop");
        assert_eq!(
            map.namespace_for_file(Path::new("/site/src/pages/home/index.jsx")),
            Some("shop")
        );
        assert_eq!(
            map.namespace_for_file(Path::new("/site/src/pages/about/index.jsx")),
            None
        );
    }

    #[test]
    fn test_load_is_best_effort() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join(PREFIX_MAP_FILE);
        assert!(PrefixMap::load(&missing).is_empty());

        fs::write(&missing, "not json").unwrap();
        assert!(PrefixMap::load(&missing).is_empty());
        assert!(PrefixMap::try_load(&missing).is_err());

        fs::write(&missing, r#"{"home":"shop"}"#).unwrap();
        assert_eq!(PrefixMap::load(&missing).namespace_for("home"), Some("shop"));
    }
}
