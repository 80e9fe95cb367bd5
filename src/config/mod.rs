//! Configuration merge
//!
//! Builds the final configuration handed to the CSS build:
//! 1. Built-in base layer (content globs, dark mode, plugins, safelist)
//! 2. Every namespace config, in load order

mod defaults;
mod effective;
mod merge;

pub use defaults::BaseConfig;
pub use effective::{ConfigOrigin, ConfigSource, EffectiveConfig};
pub use merge::{deep_merge, merge_layers};
