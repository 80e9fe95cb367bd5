//! Built-in base configuration
//!
//! The first merge layer: content globs (plus the synthesized debug file),
//! dark mode, the deduplicated plugin list and the safelist.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Built-in base configuration values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseConfig {
    /// Static content globs scanned by the CSS build
    pub content: Vec<String>,

    /// Dark mode strategy (default: "class")
    pub dark_mode: String,
}

impl Default for BaseConfig {
    fn default() -> Self {
        Self {
            content: vec![
                "./index.html".to_string(),
                "./src/**/*.{js,ts,jsx,tsx}".to_string(),
            ],
            dark_mode: "class".to_string(),
        }
    }
}

impl BaseConfig {
    /// Convert to JSON Value for merging
    pub fn to_value(
        &self,
        debug_file: &Path,
        plugins: &[Value],
        safelist: &BTreeSet<String>,
    ) -> Value {
        let mut content: Vec<Value> = self.content.iter().cloned().map(Value::String).collect();
        content.push(Value::String(debug_file.to_string_lossy().to_string()));

        serde_json::json!({
            "content": content,
            "darkMode": self.dark_mode,
            "plugins": plugins,
            "safelist": safelist,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let base = BaseConfig::default();
        assert_eq!(base.content.len(), 2);
        assert_eq!(base.dark_mode, "class");
    }

    #[test]
    fn test_to_value() {
        let safelist = BTreeSet::from(["text-shop-primary".to_string()]);
        let value = BaseConfig::default().to_value(
            Path::new("/site/src/styles/_scoped-debug.jsx"),
            &[json!("forms")],
            &safelist,
        );

        assert_eq!(value["darkMode"], "class");
        assert_eq!(value["content"][2], "/site/src/styles/_scoped-debug.jsx");
        assert_eq!(value["plugins"], json!(["forms"]));
        assert_eq!(value["safelist"], json!(["text-shop-primary"]));
    }
}
