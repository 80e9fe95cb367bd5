//! Namespace config loading
//!
//! Each namespace is one config file in the config directory, named
//! `{namespace}.config.json` or `{namespace}.config.toml`. Loading builds
//! the usage index of which namespaces declare each `theme.extend`
//! `(section, field)` token.

mod usage;

pub use usage::{TokenKey, UsageIndex};

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};

/// File-name marker between the namespace key and the extension
pub const CONFIG_MARKER: &str = ".config.";

/// Supported config file extensions
pub const CONFIG_EXTENSIONS: &[&str] = &["json", "toml"];

/// Errors for a single namespace config. The namespace is dropped, the pass
/// continues.
#[derive(Debug, thiserror::Error)]
pub enum NamespaceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parse error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("TOML parse error in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("{0} is not a namespace config file")]
    NotConfigFile(PathBuf),

    #[error("{0} does not contain a config object")]
    NotAnObject(PathBuf),

    #[error("namespace '{key}' is already defined; ignoring {path}")]
    Duplicate { key: String, path: PathBuf },
}

/// Fatal loading error: nothing can be scoped without the config directory.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read config directory {path}: {source}")]
    ConfigDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One namespace's configuration object.
#[derive(Debug, Clone, PartialEq)]
pub struct NamespaceConfig {
    /// Namespace key (file stem without `.config`)
    pub key: String,
    /// Source file
    pub path: PathBuf,
    /// The raw configuration object, renamed in place by scoping
    pub raw: Value,
}

impl NamespaceConfig {
    /// Namespace key for a config file name, if it is one.
    ///
    /// `shop.config.json` -> `shop`
    pub fn key_for(path: &Path) -> Option<String> {
        let name = path.file_name()?.to_str()?;
        let (key, ext) = name.rsplit_once(CONFIG_MARKER)?;
        if key.is_empty() || !CONFIG_EXTENSIONS.contains(&ext) {
            return None;
        }
        Some(key.to_string())
    }

    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self, NamespaceError> {
        let key =
            Self::key_for(path).ok_or_else(|| NamespaceError::NotConfigFile(path.to_path_buf()))?;
        let contents = fs::read_to_string(path).map_err(|source| NamespaceError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let raw = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => {
                let value: toml::Value =
                    toml::from_str(&contents).map_err(|source| NamespaceError::Toml {
                        path: path.to_path_buf(),
                        source,
                    })?;
                toml_to_json(value)
            }
            _ => serde_json::from_str(&contents).map_err(|source| NamespaceError::Json {
                path: path.to_path_buf(),
                source,
            })?,
        };

        if !raw.is_object() {
            return Err(NamespaceError::NotAnObject(path.to_path_buf()));
        }

        Ok(Self {
            key,
            path: path.to_path_buf(),
            raw,
        })
    }

    /// Build a namespace from an in-memory value.
    pub fn from_value(key: impl Into<String>, raw: Value) -> Self {
        Self {
            key: key.into(),
            path: PathBuf::new(),
            raw,
        }
    }

    /// The `theme.extend` object, if present.
    pub fn theme_extension(&self) -> Option<&Map<String, Value>> {
        self.raw.get("theme")?.get("extend")?.as_object()
    }

    /// Mutable `theme.extend.{section}` object, if present.
    pub fn section_mut(&mut self, section: &str) -> Option<&mut Map<String, Value>> {
        self.raw
            .get_mut("theme")?
            .get_mut("extend")?
            .get_mut(section)?
            .as_object_mut()
    }

    /// Every `(section, field)` declared under `theme.extend`, in key order.
    ///
    /// Sections that are not objects declare nothing.
    pub fn declared_tokens(&self) -> Vec<TokenKey> {
        let Some(extend) = self.theme_extension() else {
            return Vec::new();
        };
        extend
            .iter()
            .filter_map(|(section, values)| values.as_object().map(|fields| (section, fields)))
            .flat_map(|(section, fields)| {
                fields.keys().map(move |field| TokenKey::new(section.clone(), field.clone()))
            })
            .collect()
    }

    /// The `plugins` list, empty when absent or not an array.
    pub fn plugins(&self) -> &[Value] {
        self.raw
            .get("plugins")
            .and_then(|p| p.as_array())
            .map(|p| p.as_slice())
            .unwrap_or(&[])
    }
}

/// Load status of one config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum NamespaceStatus {
    Loaded,
    Failed { error: String },
}

/// Per-file result of namespace loading
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamespaceOutcome {
    pub path: PathBuf,
    #[serde(flatten)]
    pub status: NamespaceStatus,
}

/// Everything the loader produces for one build pass.
#[derive(Debug, Clone, Default)]
pub struct LoadedNamespaces {
    /// Successfully loaded namespaces, in file-name order
    pub configs: Vec<NamespaceConfig>,
    /// Which namespaces declare each token
    pub usage: UsageIndex,
    /// Deduplicated plugin references, first occurrence first
    pub plugins: Vec<Value>,
    /// One entry per config file found
    pub outcomes: Vec<NamespaceOutcome>,
}

impl LoadedNamespaces {
    /// Add a loaded namespace, indexing its tokens and plugins.
    pub fn insert(&mut self, config: NamespaceConfig) -> Result<(), NamespaceError> {
        if self.configs.iter().any(|c| c.key == config.key) {
            return Err(NamespaceError::Duplicate {
                key: config.key,
                path: config.path,
            });
        }

        for token in config.declared_tokens() {
            self.usage.record(token, &config.key);
        }
        for plugin in config.plugins() {
            if !self.plugins.contains(plugin) {
                self.plugins.push(plugin.clone());
            }
        }
        self.configs.push(config);
        Ok(())
    }
}

/// Load every namespace config in `config_dir`.
///
/// Only an unreadable directory is an error. A file that fails to load is
/// logged and recorded as failed in `outcomes`.
pub fn load_namespaces(config_dir: &Path) -> Result<LoadedNamespaces, LoadError> {
    let entries = fs::read_dir(config_dir).map_err(|source| LoadError::ConfigDir {
        path: config_dir.to_path_buf(),
        source,
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && NamespaceConfig::key_for(path).is_some())
        .collect();
    files.sort();

    let mut loaded = LoadedNamespaces::default();
    for path in files {
        let result = NamespaceConfig::load(&path).and_then(|config| loaded.insert(config));
        let status = match result {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "loaded namespace config");
                NamespaceStatus::Loaded
            }
            Err(e) => {
                tracing::error!("Error loading {}: {}", path.display(), e);
                NamespaceStatus::Failed {
                    error: e.to_string(),
                }
            }
        };
        loaded.outcomes.push(NamespaceOutcome { path, status });
    }

    Ok(loaded)
}

/// Convert TOML Value to JSON Value
fn toml_to_json(toml: toml::Value) -> Value {
    match toml {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(arr) => Value::Array(arr.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}
