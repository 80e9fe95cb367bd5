//! Final configuration with provenance
//!
//! The effective config is the base layer deep-merged with every namespace's
//! (renamed) configuration object, namespaces taking precedence.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::merge::merge_layers;
use crate::namespace::NamespaceConfig;

/// Origin of a configuration layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigOrigin {
    Base,
    Namespace,
}

/// A contributing config layer with provenance
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfigSource {
    /// Origin of this layer
    pub origin: ConfigOrigin,

    /// Namespace key (None for the base layer)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// File path (None for the base layer)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Merged configuration plus the layers it came from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EffectiveConfig {
    /// The merged configuration object
    pub config: Value,

    /// Contributing layers in precedence order
    pub sources: Vec<ConfigSource>,
}

impl EffectiveConfig {
    /// Merge `base` with every namespace config, in order.
    ///
    /// Arrays are unioned so namespace `plugins`/`safelist` entries extend
    /// the base lists instead of replacing them.
    pub fn build(base: Value, namespaces: &[NamespaceConfig]) -> Self {
        let mut layers = Vec::with_capacity(namespaces.len() + 1);
        let mut sources = Vec::with_capacity(namespaces.len() + 1);

        layers.push(base);
        sources.push(ConfigSource {
            origin: ConfigOrigin::Base,
            namespace: None,
            path: None,
        });

        for ns in namespaces {
            layers.push(ns.raw.clone());
            sources.push(ConfigSource {
                origin: ConfigOrigin::Namespace,
                namespace: Some(ns.key.clone()),
                path: if ns.path.as_os_str().is_empty() {
                    None
                } else {
                    Some(ns.path.to_string_lossy().to_string())
                },
            });
        }

        Self {
            config: merge_layers(layers),
            sources,
        }
    }
}
