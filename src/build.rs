//! Build pass orchestration
//!
//! One pass runs, in order:
//! - Load namespace configs and index their tokens
//! - Scope colliding tokens
//! - Load the prefix map
//! - Discover source files and rewrite each mapped one
//! - Write the debug markup file
//! - Merge the final configuration
//! - Write the report
//!
//! Every pass starts from scratch and returns its results by value.

use std::io;
use std::path::{Component, Path, PathBuf};

use indexmap::IndexSet;
use scopewind_rewrite::{
    rewrite_file, ObservedClasses, RewriteOptions, ScopeRules, DEFAULT_CLASS_ATTRIBUTES,
    DEFAULT_CLASS_HELPERS,
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::{BaseConfig, ConfigSource, EffectiveConfig};
use crate::discovery::{discover_sources, DiscoveryError, DEFAULT_PATTERN};
use crate::markup::{render_virtual_markup, write_debug_file, DEBUG_FILE_NAME};
use crate::namespace::{load_namespaces, LoadError, NamespaceOutcome};
use crate::prefix_map::{PrefixMap, PREFIX_MAP_FILE};
use crate::report::{Report, ReportError, ReportFormat};
use crate::scoping::{scope_conflicts, Rename, ScopedKeyMap};

/// Exit code for fatal build errors
pub const EXIT_FATAL: i32 = 1;

/// Fatal build errors. Per-namespace and per-file failures are not errors;
/// they are recorded in [`BuildOutcome`].
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("failed to write debug file {path}: {source}")]
    DebugFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot determine working directory: {0}")]
    WorkingDir(#[source] io::Error),
}

impl BuildError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        EXIT_FATAL
    }
}

/// Result type for build operations
pub type BuildResult<T> = Result<T, BuildError>;

/// Build options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Directory of namespace config files
    pub config_dir: PathBuf,

    /// Root of the page sources
    pub pages_dir: PathBuf,

    /// Source glob, relative to `pages_dir`
    pub pattern: String,

    /// Compute everything, write only the report
    pub dry_run: bool,

    /// Report format
    pub report: ReportFormat,

    /// Report directory (default: base directory)
    pub report_dir: Option<PathBuf>,

    /// Directory relative paths resolve against (default: working directory)
    pub base_dir: Option<PathBuf>,

    /// JSX attributes holding class lists
    pub class_attributes: Vec<String>,

    /// Class-list helper function names
    pub class_helpers: Vec<String>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            config_dir: PathBuf::from("tailwind-configs"),
            pages_dir: PathBuf::from("src/pages"),
            pattern: DEFAULT_PATTERN.to_string(),
            dry_run: false,
            report: ReportFormat::Txt,
            report_dir: None,
            base_dir: None,
            class_attributes: DEFAULT_CLASS_ATTRIBUTES.iter().map(|s| s.to_string()).collect(),
            class_helpers: DEFAULT_CLASS_HELPERS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl BuildOptions {
    fn rewrite_options(&self) -> RewriteOptions {
        RewriteOptions {
            attributes: self.class_attributes.clone(),
            helpers: self.class_helpers.clone(),
            dry_run: self.dry_run,
        }
    }
}

/// Absolute paths used by a build pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPaths {
    pub config_dir: PathBuf,
    pub pages_dir: PathBuf,
    pub prefix_map: PathBuf,
    pub debug_file: PathBuf,
    pub report_dir: PathBuf,
}

impl BuildPaths {
    /// Resolve every path in `options` against its base directory.
    pub fn resolve(options: &BuildOptions) -> BuildResult<Self> {
        let base = match &options.base_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().map_err(BuildError::WorkingDir)?,
        };
        let resolve = |p: &Path| normalize_path(&base.join(p));

        let config_dir = resolve(&options.config_dir);
        let pages_dir = resolve(&options.pages_dir);
        let report_dir = resolve(options.report_dir.as_deref().unwrap_or(Path::new(".")));
        let debug_file = normalize_path(&pages_dir.join("..").join("styles").join(DEBUG_FILE_NAME));

        Ok(Self {
            prefix_map: config_dir.join(PREFIX_MAP_FILE),
            config_dir,
            pages_dir,
            debug_file,
            report_dir,
        })
    }
}

/// Lexically remove `.` and resolve `..` components.
fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Why a discovered file was not rewritten
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Page has no prefix-map entry
    Unmapped,
    /// Namespace has no scoped tokens
    NothingScoped,
    /// File disappeared before it was read
    Missing,
}

/// Per-file status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    Rewritten,
    Unchanged,
    Skipped { reason: SkipReason },
    Failed { error: String },
}

/// Per-file result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub namespace: Option<String>,
    #[serde(flatten)]
    pub status: FileStatus,
    /// Template-string fragments glued to an interpolation
    pub partial_tokens: Vec<String>,
}

impl FileOutcome {
    fn new(path: &Path, namespace: Option<&str>, status: FileStatus) -> Self {
        Self {
            path: path.to_path_buf(),
            namespace: namespace.map(|s| s.to_string()),
            status,
            partial_tokens: Vec::new(),
        }
    }
}

/// Everything a build pass produced
#[derive(Debug, Clone, PartialEq)]
pub struct BuildOutcome {
    /// Final merged configuration
    pub config: Value,
    /// Layers merged into `config`
    pub config_sources: Vec<ConfigSource>,
    pub namespaces: Vec<NamespaceOutcome>,
    pub files: Vec<FileOutcome>,
    pub renames: Vec<Rename>,
    pub scoped_keys: ScopedKeyMap,
    pub safelist: Vec<String>,
    /// Files whose text changed
    pub changed_files: Vec<PathBuf>,
    /// Scoped field names, then every observed class, then template
    /// fragments next to an interpolation
    pub scoped_classes: Vec<String>,
    /// Classes written to the debug markup
    pub virtual_classes: Vec<String>,
    pub debug_file: PathBuf,
    pub report_file: PathBuf,
    pub dry_run: bool,
}

impl BuildOutcome {
    /// Files that failed to rewrite
    pub fn failed_files(&self) -> impl Iterator<Item = &FileOutcome> {
        self.files
            .iter()
            .filter(|f| matches!(f.status, FileStatus::Failed { .. }))
    }

    /// Human-readable one-line summary
    pub fn summary(&self) -> String {
        let count = |pred: fn(&FileStatus) -> bool| self.files.iter().filter(|f| pred(&f.status)).count();
        format!(
            "{} scoped token(s), {} file(s) scanned: {} rewritten, {} unchanged, {} skipped, {} failed",
            self.renames.len(),
            self.files.len(),
            count(|s| matches!(s, FileStatus::Rewritten)),
            count(|s| matches!(s, FileStatus::Unchanged)),
            count(|s| matches!(s, FileStatus::Skipped { .. })),
            count(|s| matches!(s, FileStatus::Failed { .. })),
        )
    }
}

/// Run one build pass.
pub fn build(options: &BuildOptions) -> BuildResult<BuildOutcome> {
    let paths = BuildPaths::resolve(options)?;

    let mut loaded = load_namespaces(&paths.config_dir)?;
    let scoping = scope_conflicts(&loaded.usage, &mut loaded.configs);
    let prefix_map = PrefixMap::load(&paths.prefix_map);

    let sources = discover_sources(&paths.pages_dir, &options.pattern)?;
    let rewrite_options = options.rewrite_options();

    let mut observed = ObservedClasses::new();
    let files: Vec<FileOutcome> = sources
        .iter()
        .map(|path| {
            rewrite_source_file(
                path,
                &prefix_map,
                &scoping.scoped_keys,
                &rewrite_options,
                &mut observed,
            )
        })
        .collect();

    let virtual_classes: Vec<String> = observed.classes.iter().cloned().collect();
    let markup = render_virtual_markup(&virtual_classes);
    if options.dry_run {
        tracing::debug!(
            "[dry-run] Would write virtual debug file: {}",
            paths.debug_file.display()
        );
    } else {
        write_debug_file(&paths.debug_file, &markup).map_err(|source| BuildError::DebugFile {
            path: paths.debug_file.clone(),
            source,
        })?;
    }

    let base = BaseConfig::default().to_value(&paths.debug_file, &loaded.plugins, &scoping.safelist);
    let effective = EffectiveConfig::build(base, &loaded.configs);

    let changed_files: Vec<PathBuf> = files
        .iter()
        .filter(|f| f.status == FileStatus::Rewritten)
        .map(|f| f.path.clone())
        .collect();

    let mut scoped_classes: IndexSet<String> = scoping.scoped_names().into_iter().collect();
    scoped_classes.extend(virtual_classes.iter().cloned());
    scoped_classes.extend(observed.partial.iter().cloned());
    let scoped_classes: Vec<String> = scoped_classes.into_iter().collect();

    let report = Report::new(
        changed_files
            .iter()
            .map(|p| p.to_string_lossy().to_string())
            .collect(),
        scoped_classes.clone(),
    );
    let report_file = report.write(&paths.report_dir, options.report)?;

    let outcome = BuildOutcome {
        config: effective.config,
        config_sources: effective.sources,
        namespaces: loaded.outcomes,
        files,
        renames: scoping.renames,
        scoped_keys: scoping.scoped_keys,
        safelist: scoping.safelist.into_iter().collect(),
        changed_files,
        scoped_classes,
        virtual_classes,
        debug_file: paths.debug_file,
        report_file,
        dry_run: options.dry_run,
    };
    tracing::debug!("{}", outcome.summary());

    Ok(outcome)
}

/// Rewrite one discovered file. Failures are logged and recorded, never
/// propagated.
fn rewrite_source_file(
    path: &Path,
    prefix_map: &PrefixMap,
    scoped_keys: &ScopedKeyMap,
    options: &RewriteOptions,
    observed: &mut ObservedClasses,
) -> FileOutcome {
    let Some(namespace) = prefix_map.namespace_for_file(path) else {
        return FileOutcome::new(
            path,
            None,
            FileStatus::Skipped {
                reason: SkipReason::Unmapped,
            },
        );
    };

    let rules: ScopeRules = scoped_keys.rules_for(namespace);
    if rules.is_empty() {
        tracing::debug!(path = %path.display(), namespace, "nothing scoped for namespace");
        return FileOutcome::new(
            path,
            Some(namespace),
            FileStatus::Skipped {
                reason: SkipReason::NothingScoped,
            },
        );
    }

    match rewrite_file(path, &rules, options) {
        Ok(Some(rewrite)) => {
            let status = if rewrite.changed {
                FileStatus::Rewritten
            } else {
                FileStatus::Unchanged
            };
            let partial_tokens: Vec<String> = rewrite.observed.partial.iter().cloned().collect();
            if !partial_tokens.is_empty() {
                tracing::debug!(
                    path = %path.display(),
                    "template fragments next to interpolations: {}",
                    partial_tokens.join(" ")
                );
            }
            observed.extend(rewrite.observed);

            let mut outcome = FileOutcome::new(path, Some(namespace), status);
            outcome.partial_tokens = partial_tokens;
            outcome
        }
        Ok(None) => FileOutcome::new(
            path,
            Some(namespace),
            FileStatus::Skipped {
                reason: SkipReason::Missing,
            },
        ),
        Err(e) => {
            tracing::error!("AST update failed for {}: {}", path.display(), e);
            FileOutcome::new(
                path,
                Some(namespace),
                FileStatus::Failed {
                    error: e.to_string(),
                },
            )
        }
    }
}
