//! Site fixtures for build-pass tests
//!
//! A `Site` is a temporary project tree with a config directory, a prefix
//! map and a pages root, laid out the way the CLI defaults expect.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use scopewind::{BuildOptions, ReportFormat};
use tempfile::TempDir;

pub const CONFIG_DIR: &str = "tailwind-configs";
pub const PAGES_DIR: &str = "src/pages";

pub const SHOP_CONFIG: &str = r##"{
  "theme": { "extend": { "colors": { "primary": "#f00", "accent": "#0f0" } } },
  "plugins": ["@tailwindcss/forms"]
}"##;

pub const BLOG_CONFIG: &str = r##"{
  "theme": { "extend": { "colors": { "primary": "#00f" }, "spacing": { "gutter": "2rem" } } },
  "plugins": ["@tailwindcss/forms", "@tailwindcss/typography"]
}"##;

pub const SHOP_PAGE: &str = r#"import clsx from "clsx";

export default function Home({ active }) {
  return (
    <main className="bg-primary text-primary hover-primary">
      <h1 className={clsx("p-4 text-accent", { "border-primary": active })}>Shop</h1>
    </main>
  );
}
"#;

pub const ABOUT_PAGE: &str = r#"export default () => <div className="bg-primary p-2" />;
"#;

pub struct Site {
    pub dir: TempDir,
}

impl Site {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::create_dir_all(dir.path().join(CONFIG_DIR)).expect("create config dir");
        fs::create_dir_all(dir.path().join(PAGES_DIR)).expect("create pages dir");
        Self { dir }
    }

    /// Shop and blog both declare `colors.primary`; `home` belongs to shop,
    /// `about` has no prefix-map entry.
    pub fn shop_and_blog() -> Self {
        let site = Self::new();
        site.namespace("shop.config.json", SHOP_CONFIG);
        site.namespace("blog.config.json", BLOG_CONFIG);
        site.prefix_map(r#"{"home": "shop", "news": "blog"}"#);
        site.page("home/index.jsx", SHOP_PAGE);
        site.page("about/index.jsx", ABOUT_PAGE);
        site
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn namespace(&self, file: &str, content: &str) {
        fs::write(self.root().join(CONFIG_DIR).join(file), content).expect("write namespace config");
    }

    pub fn prefix_map(&self, content: &str) {
        fs::write(self.root().join(CONFIG_DIR).join("prefix-map.json"), content)
            .expect("write prefix map");
    }

    pub fn page(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.page_path(rel);
        fs::create_dir_all(path.parent().expect("page parent")).expect("create page dir");
        fs::write(&path, content).expect("write page");
        path
    }

    pub fn page_path(&self, rel: &str) -> PathBuf {
        self.root().join(PAGES_DIR).join(rel)
    }

    pub fn read_page(&self, rel: &str) -> String {
        fs::read_to_string(self.page_path(rel)).expect("read page")
    }

    pub fn debug_file(&self) -> PathBuf {
        self.root().join("src/styles/_scoped-debug.jsx")
    }

    pub fn report_file(&self, format: ReportFormat) -> PathBuf {
        self.root().join(format!("scoping-report.{}", format.extension()))
    }

    pub fn options(&self) -> BuildOptions {
        BuildOptions {
            base_dir: Some(self.root().to_path_buf()),
            ..BuildOptions::default()
        }
    }
}
