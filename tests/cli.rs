//! CLI tests for the `scopewind` binary

mod fixtures;

use std::process::Command;

use fixtures::Site;

fn scopewind(site: &Site) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_scopewind"));
    cmd.current_dir(site.root());
    cmd
}

#[test]
fn test_one_shot_build() {
    let site = Site::shop_and_blog();
    let output = scopewind(&site).output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Config built with scoped support."));
    assert!(!stdout.contains("[dry-run]"));
    assert!(site.debug_file().exists());
}

#[test]
fn test_dry_run_print_config() {
    let site = Site::shop_and_blog();
    let output = scopewind(&site)
        .args(["--dry-run", "--print-config", "--report", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"shop-primary\": \"#f00\""));
    assert!(stdout.contains("[dry-run] No files were actually changed."));
    assert!(!site.debug_file().exists());
    assert!(site.root().join("scoping-report.json").exists());
}

#[test]
fn test_missing_config_dir_exits_with_error() {
    let site = Site::new();
    let output = scopewind(&site)
        .args(["--config-dir", "nowhere"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("nowhere"));
}

#[test]
fn test_invalid_report_format_is_rejected() {
    let site = Site::shop_and_blog();
    let output = scopewind(&site).args(["--report", "pdf"]).output().unwrap();
    assert!(!output.status.success());
}
