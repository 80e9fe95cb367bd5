//! Token usage index: which namespaces declare each `(section, field)`.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// A design token declared under `theme.extend.{section}.{field}`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TokenKey {
    pub section: String,
    pub field: String,
}

impl TokenKey {
    pub fn new(section: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            field: field.into(),
        }
    }
}

impl fmt::Display for TokenKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.section, self.field)
    }
}

/// Token -> declaring namespaces, in load order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageIndex {
    entries: BTreeMap<TokenKey, Vec<String>>,
}

impl UsageIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `namespace` declares `token`.
    pub fn record(&mut self, token: TokenKey, namespace: &str) {
        let owners = self.entries.entry(token).or_default();
        if !owners.iter().any(|o| o == namespace) {
            owners.push(namespace.to_string());
        }
    }

    /// Namespaces declaring `token`, empty if none.
    pub fn owners(&self, token: &TokenKey) -> &[String] {
        self.entries.get(token).map(|o| o.as_slice()).unwrap_or(&[])
    }

    /// Tokens declared by two or more namespaces.
    pub fn collisions(&self) -> impl Iterator<Item = (&TokenKey, &[String])> {
        self.entries
            .iter()
            .filter(|(_, owners)| owners.len() > 1)
            .map(|(token, owners)| (token, owners.as_slice()))
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
    fn test_display() {
        assert_eq!(TokenKey::new("colors", "primary").to_string(), "colors:primary");
    }

    #[test]
    fn test_collisions() {
        let mut index = UsageIndex::new();
        index.record(TokenKey::new("colors", "primary"), "blog");
        index.record(TokenKey::new("colors", "primary"), "shop");
        index.record(TokenKey::new("colors", "accent"), "shop");
        index.record(TokenKey::new("spacing", "primary"), "blog");

        let collisions: Vec<_> = index.collisions().collect();
        assert_eq!(collisions.len(), 1);
        assert_eq!(collisions[0].0, &TokenKey::new("colors", "primary"));
        assert_eq!(collisions[0].1, &["blog".to_string(), "shop".to_string()]);
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_record_is_idempotent_per_namespace() {
        let mut index = UsageIndex::new();
        index.record(TokenKey::new("colors", "primary"), "shop");
        index.record(TokenKey::new("colors", "primary"), "shop");
        assert_eq!(index.owners(&TokenKey::new("colors", "primary")).len(), 1);
        assert!(index.owners(&TokenKey::new("colors", "missing")).is_empty());
    }
}
