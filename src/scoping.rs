//! Conflict scoping
//!
//! A token declared by two or more namespaces is renamed inside each owning
//! namespace to `{namespace}-{field}`. Tokens declared by a single namespace
//! keep their names, so class names only change when there is a real
//! collision.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use scopewind_rewrite::ScopeRules;
use serde::Serialize;
use serde_json::Value;

use crate::namespace::{NamespaceConfig, UsageIndex};

/// Section whose safelist entries use the `text-` utility prefix
pub const COLOR_SECTION: &str = "colors";

/// `section -> original field -> scoped field` for one namespace
pub type SectionRenames = BTreeMap<String, BTreeMap<String, String>>;

/// Scoped name of `field` inside `namespace`.
pub fn scoped_field(namespace: &str, field: &str) -> String {
    format!("{}-{}", namespace, field)
}

/// Safelist class for a scoped field.
///
/// `colors` fields use `text-`, every other section uses `{section}-`.
pub fn safelist_class(section: &str, scoped: &str) -> String {
    let prefix = if section == COLOR_SECTION { "text" } else { section };
    format!("{}-{}", prefix, scoped)
}

/// One applied rename
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rename {
    pub namespace: String,
    pub section: String,
    pub original: String,
    pub scoped: String,
}

/// All renames of a build pass, keyed by namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScopedKeyMap {
    namespaces: BTreeMap<String, SectionRenames>,
}

impl ScopedKeyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, rename: &Rename) {
        self.namespaces
            .entry(rename.namespace.clone())
            .or_default()
            .entry(rename.section.clone())
            .or_default()
            .insert(rename.original.clone(), rename.scoped.clone());
    }

    /// The renames recorded for one namespace.
    pub fn get(&self, namespace: &str) -> Option<&SectionRenames> {
        self.namespaces.get(namespace)
    }

    /// Rewrite rules for one namespace; empty when nothing was renamed.
    pub fn rules_for(&self, namespace: &str) -> ScopeRules {
        self.get(namespace)
            .map(ScopeRules::from_sections)
            .unwrap_or_default()
    }

    /// Scoped name for `(section, field)` in `namespace`, if renamed.
    pub fn lookup(&self, namespace: &str, section: &str, field: &str) -> Option<&str> {
        self.get(namespace)?
            .get(section)?
            .get(field)
            .map(|s| s.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }
}

/// Output of conflict scoping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopingResult {
    pub scoped_keys: ScopedKeyMap,
    /// Renames in the order they were applied
    pub renames: Vec<Rename>,
    pub safelist: BTreeSet<String>,
}

impl ScopingResult {
    /// Scoped field names, in rename order, without duplicates.
    pub fn scoped_names(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        self.renames
            .iter()
            .filter(|r| seen.insert(r.scoped.clone()))
            .map(|r| r.scoped.clone())
            .collect()
    }
}

/// Empty token values: null, `false`, `0` and `""`.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Rename every colliding token inside its owning namespaces.
///
/// The value moves from `field` to `{namespace}-{field}` and `field` is
/// removed, so a namespace never exposes both names. A missing or empty
/// value (null, `false`, `0`, `""`) is left alone.
pub fn scope_conflicts(usage: &UsageIndex, configs: &mut [NamespaceConfig]) -> ScopingResult {
    let positions: HashMap<String, usize> = configs
        .iter()
        .enumerate()
        .map(|(i, c)| (c.key.clone(), i))
        .collect();

    let mut result = ScopingResult::default();

    for (token, owners) in usage.collisions() {
        for namespace in owners {
            let Some(&idx) = positions.get(namespace) else {
                continue;
            };
            let Some(section) = configs[idx].section_mut(&token.section) else {
                continue;
            };
            if section.get(&token.field).map_or(true, is_falsy) {
                continue;
            }

            let scoped = scoped_field(namespace, &token.field);
            if let Some(value) = section.remove(&token.field) {
                section.insert(scoped.clone(), value);
            }

            let rename = Rename {
                namespace: namespace.clone(),
                section: token.section.clone(),
                original: token.field.clone(),
                scoped,
            };
            tracing::debug!(
                namespace = %rename.namespace,
                token = %token,
                scoped = %rename.scoped,
                "scoped colliding token"
            );
            result.safelist.insert(safelist_class(&rename.section, &rename.scoped));
            result.scoped_keys.record(&rename);
            result.renames.push(rename);
        }
    }

    result
}
