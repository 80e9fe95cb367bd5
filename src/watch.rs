//! Watch mode
//!
//! Runs an initial build, then rebuilds whenever a page source under the
//! pages root changes. Builds run on the loop thread, so two passes never
//! overlap; bursts of events are coalesced by [`RebuildQueue`].

use std::path::Path;
use std::sync::mpsc::{channel, RecvTimeoutError};
use std::sync::Arc;
use std::time::{Duration, Instant};

use notify::{EventKind, RecursiveMode, Watcher};
use thiserror::Error;

use crate::build::{build, BuildOptions, BuildOutcome, BuildPaths};
use crate::signal::ShutdownState;

/// Quiet period before a queued rebuild runs
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(200);

/// Poll interval of the watch loop
const TICK: Duration = Duration::from_millis(100);

/// Source extensions that trigger a rebuild
const WATCHED_EXTENSIONS: &[&str] = &["jsx", "tsx"];

#[derive(Debug, Error)]
pub enum WatchError {
    #[error(transparent)]
    Paths(#[from] crate::build::BuildError),

    #[error("failed to start watcher: {0}")]
    Start(#[source] notify::Error),

    #[error("failed to watch {path}: {source}")]
    Watch {
        path: std::path::PathBuf,
        #[source]
        source: notify::Error,
    },
}

impl WatchError {
    pub fn exit_code(&self) -> i32 {
        crate::build::EXIT_FATAL
    }
}

/// Debounced rebuild request.
///
/// A request becomes due once no further request has arrived for the
/// debounce window.
#[derive(Debug, Clone)]
pub struct RebuildQueue {
    window: Duration,
    last_request: Option<Instant>,
}

impl RebuildQueue {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_request: None,
        }
    }

    /// Queue a rebuild, restarting the quiet period.
    pub fn request(&mut self, now: Instant) {
        self.last_request = Some(now);
    }

    pub fn is_pending(&self) -> bool {
        self.last_request.is_some()
    }

    /// Take the queued rebuild if its quiet period has elapsed.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.last_request {
            Some(at) if now.saturating_duration_since(at) >= self.window => {
                self.last_request = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for RebuildQueue {
    fn default() -> Self {
        Self::new(DEBOUNCE_WINDOW)
    }
}

/// Whether a file event should trigger a rebuild.
pub fn is_relevant(event: &notify::Event, pages_dir: &Path) -> bool {
    if matches!(event.kind, EventKind::Access(_)) {
        return false;
    }
    event.paths.iter().any(|path| {
        path.starts_with(pages_dir)
            && path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| WATCHED_EXTENSIONS.contains(&ext))
    })
}

/// Run one pass, logging instead of propagating failures.
fn run_pass(options: &BuildOptions) -> Option<BuildOutcome> {
    match build(options) {
        Ok(outcome) => {
            tracing::info!("{}", outcome.summary());
            Some(outcome)
        }
        Err(e) => {
            tracing::error!("Build failed: {}", e);
            None
        }
    }
}

/// Watch the pages root and rebuild on change until `shutdown` asks to stop.
pub fn watch(options: &BuildOptions, shutdown: Arc<ShutdownState>) -> Result<(), WatchError> {
    let paths = BuildPaths::resolve(options)?;

    run_pass(options);

    let (tx, rx) = channel();
    let mut watcher = notify::recommended_watcher(tx).map_err(WatchError::Start)?;
    watcher
        .watch(&paths.pages_dir, RecursiveMode::Recursive)
        .map_err(|source| WatchError::Watch {
            path: paths.pages_dir.clone(),
            source,
        })?;

    tracing::info!(
        "Watching {} for changes (press Ctrl+C to stop)",
        paths.pages_dir.display()
    );

    let mut queue = RebuildQueue::default();
    while !shutdown.is_stop_requested() {
        match rx.recv_timeout(TICK) {
            Ok(Ok(event)) => {
                if is_relevant(&event, &paths.pages_dir) {
                    tracing::debug!(paths = ?event.paths, "source change");
                    queue.request(Instant::now());
                }
            }
            Ok(Err(e)) => tracing::warn!("watch error: {}", e),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        if queue.take_due(Instant::now()) {
            tracing::info!("Change detected, rebuilding");
            run_pass(options);
        }
    }

    tracing::info!("Watch stopped");
    Ok(())
}
