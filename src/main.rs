//! scopewind CLI
//!
//! Entry point for the `scopewind` command-line tool.

use clap::Parser;
use scopewind::signal::{self, ShutdownState};
use scopewind::{build, watch, BuildOptions, ReportFormat};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tracing::Level;

#[derive(Parser)]
#[command(name = "scopewind")]
#[command(about = "Merge namespace utility-class configs and scope colliding theme tokens", version)]
struct Cli {
    /// Rebuild whenever a page source changes
    #[arg(long)]
    watch: bool,

    /// Directory of `{namespace}.config.{json,toml}` files
    #[arg(long, default_value = "tailwind-configs")]
    config_dir: PathBuf,

    /// Root of the page sources
    #[arg(long, default_value = "src/pages")]
    pages_dir: PathBuf,

    /// Source glob, relative to the pages directory
    #[arg(long, default_value = scopewind::discovery::DEFAULT_PATTERN)]
    pattern: String,

    /// Log per-file decisions
    #[arg(long, short = 'v')]
    verbose: bool,

    /// Compute everything but only write the report
    #[arg(long)]
    dry_run: bool,

    /// Report format (txt, json, html)
    #[arg(long, default_value = "txt")]
    report: ReportFormat,

    /// Directory for the report file (default: current directory)
    #[arg(long)]
    report_dir: Option<PathBuf>,

    /// Print the merged configuration as JSON
    #[arg(long)]
    print_config: bool,
}

impl Cli {
    fn build_options(&self) -> BuildOptions {
        BuildOptions {
            config_dir: self.config_dir.clone(),
            pages_dir: self.pages_dir.clone(),
            pattern: self.pattern.clone(),
            dry_run: self.dry_run,
            report: self.report,
            report_dir: self.report_dir.clone(),
            ..BuildOptions::default()
        }
    }
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let options = cli.build_options();

    if cli.watch {
        run_watch(&options);
    } else {
        run_build(&options, cli.print_config);
    }
}

fn run_build(options: &BuildOptions, print_config: bool) {
    let outcome = match build(options) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        }
    };

    tracing::info!("{}", outcome.summary());

    if print_config {
        match serde_json::to_string_pretty(&outcome.config) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error serializing config: {}", e),
        }
    }

    println!("Config built with scoped support.");
    if options.dry_run {
        println!("[dry-run] No files were actually changed.");
    }
}

fn run_watch(options: &BuildOptions) {
    let shutdown = Arc::new(ShutdownState::new());
    if let Err(e) = signal::install(Arc::clone(&shutdown)) {
        eprintln!("Error installing Ctrl+C handler: {}", e);
        process::exit(1);
    }

    if let Err(e) = watch(options, shutdown) {
        eprintln!("Error: {}", e);
        process::exit(e.exit_code());
    }
}
