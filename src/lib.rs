//! scopewind - namespace-scoped utility-class configs
//!
//! Merges per-namespace utility-CSS theme configs into one configuration.
//! Theme tokens declared by more than one namespace are renamed to
//! `{namespace}-{token}`, and the page sources owned by each namespace are
//! rewritten so their class names follow the rename.

pub mod build;
pub mod config;
pub mod discovery;
pub mod markup;
pub mod namespace;
pub mod prefix_map;
pub mod report;
pub mod scoping;
pub mod signal;
pub mod watch;

pub use build::{
    build, BuildError, BuildOptions, BuildOutcome, BuildPaths, FileOutcome, FileStatus,
    SkipReason,
};
pub use config::{deep_merge, BaseConfig, EffectiveConfig};
pub use namespace::{load_namespaces, LoadedNamespaces, NamespaceConfig, TokenKey, UsageIndex};
pub use prefix_map::PrefixMap;
pub use report::{Report, ReportFormat};
pub use scoping::{scope_conflicts, ScopedKeyMap, ScopingResult};
pub use watch::{watch, RebuildQueue, WatchError};
