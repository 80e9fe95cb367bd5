//! Scoping report (scoping-report.{txt,json,html})

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Report file stem
pub const REPORT_STEM: &str = "scoping-report";

/// Report title used by the txt and html formats
pub const REPORT_TITLE: &str = "Scoping report";

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Txt,
    Json,
    Html,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Txt => "txt",
            ReportFormat::Json => "json",
            ReportFormat::Html => "html",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "txt" => Ok(ReportFormat::Txt),
            "json" => Ok(ReportFormat::Json),
            "html" => Ok(ReportFormat::Html),
            other => Err(format!(
                "invalid report format '{}'. Valid: txt, json, html",
                other
            )),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write report {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Report contents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub changed_files: Vec<String>,
    pub scoped_classes: Vec<String>,
}

impl Report {
    pub fn new(changed_files: Vec<String>, scoped_classes: Vec<String>) -> Self {
        Self {
            changed_files,
            scoped_classes,
        }
    }

    /// Render the report in `format`.
    pub fn render(&self, format: ReportFormat) -> Result<String, ReportError> {
        Ok(match format {
            ReportFormat::Txt => self.to_text(),
            ReportFormat::Json => serde_json::to_string(self)?,
            ReportFormat::Html => self.to_html(),
        })
    }

    fn to_text(&self) -> String {
        format!(
            "{}\n\nChanged files:\n{}\n\nScoped classes:\n{}\n",
            REPORT_TITLE,
            self.changed_files.join("\n"),
            self.scoped_classes.join("\n")
        )
    }

    fn to_html(&self) -> String {
        let items = |values: &[String]| -> String {
            values
                .iter()
                .map(|v| format!("<li>{}</li>", escape_html(v)))
                .collect()
        };
        format!(
            "<html><body><h2>{}</h2>\n<h3>Changed files</h3>\n<ul>{}</ul>\n<h3>Scoped classes</h3>\n<ul>{}</ul>\n</body></html>\n",
            REPORT_TITLE,
            items(&self.changed_files),
            items(&self.scoped_classes)
        )
    }

    /// Write the report into `dir`, returning the file path.
    pub fn write(&self, dir: &Path, format: ReportFormat) -> Result<PathBuf, ReportError> {
        let path = report_path(dir, format);
        let content = self.render(format)?;
        fs::write(&path, content).map_err(|source| ReportError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

/// Report file path for a format.
pub fn report_path(dir: &Path, format: ReportFormat) -> PathBuf {
    dir.join(format!("{}.{}", REPORT_STEM, format.extension()))
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
