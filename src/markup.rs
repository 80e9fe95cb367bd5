//! Synthesized debug markup.
//!
//! A single JSX element whose `className` lists every class seen while
//! rewriting, so a static content scanner treats them as used.

use std::fs;
use std::io;
use std::path::Path;

/// Debug file name, placed in `{pages_dir}/../styles/`
pub const DEBUG_FILE_NAME: &str = "_scoped-debug.jsx";

/// Render the debug module for `classes`.
pub fn render_virtual_markup(classes: &[String]) -> String {
    let joined = classes.join(" ").replace('"', "&quot;");
    format!("export default () => (<div className=\"{}\" />);\n", joined)
}

/// Write the debug module, creating its directory if needed.
pub fn write_debug_file(path: &Path, content: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        let classes = vec!["bg-shop-primary".to_string(), "p-4".to_string()];
        assert_eq!(
            render_virtual_markup(&classes),
            "export default () => (<div className=\"bg-shop-primary p-4\" />);\n"
        );
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(
            render_virtual_markup(&[]),
            "export default () => (<div className=\"\" />);\n"
        );
    }

    #[test]
    fn test_write_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("styles").join(DEBUG_FILE_NAME);
        write_debug_file(&path, "x").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "x");
    }
}
