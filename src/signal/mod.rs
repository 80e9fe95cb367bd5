//! Ctrl+C handling for watch mode
//!
//! The first interrupt asks the watch loop to stop once the current build
//! pass finishes. The second exits the process at once.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

/// Exit code used when a second interrupt forces an immediate exit
pub const EXIT_CODE_INTERRUPTED: i32 = 130;

/// Shared shutdown state
#[derive(Debug, Default)]
pub struct ShutdownState {
    stop_requested: AtomicBool,
    signal_count: AtomicU8,
}

impl ShutdownState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the watch loop should stop after the current pass
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::SeqCst)
    }

    pub fn signal_count(&self) -> u8 {
        self.signal_count.load(Ordering::SeqCst)
    }

    /// Record an interrupt and return what to do about it.
    pub fn handle_signal(&self) -> SignalAction {
        let count = self.signal_count.fetch_add(1, Ordering::SeqCst);
        match count {
            0 => {
                self.stop_requested.store(true, Ordering::SeqCst);
                SignalAction::StopAfterPass
            }
            1 => SignalAction::ExitNow,
            _ => SignalAction::Ignore,
        }
    }

    /// Ask the watch loop to stop without an interrupt.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::SeqCst);
    }
}

/// Action to take after an interrupt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalAction {
    StopAfterPass,
    ExitNow,
    Ignore,
}

/// Install the process-wide Ctrl+C handler. Must be called at most once.
pub fn install(state: Arc<ShutdownState>) -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || match state.handle_signal() {
        SignalAction::StopAfterPass => {
            tracing::info!("Interrupt received, stopping after the current pass (Ctrl+C again to exit now)");
        }
        SignalAction::ExitNow => {
            tracing::info!("Second interrupt received, exiting");
            std::process::exit(EXIT_CODE_INTERRUPTED);
        }
        SignalAction::Ignore => {}
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = ShutdownState::new();
        assert!(!state.is_stop_requested());
        assert_eq!(state.signal_count(), 0);
    }

    #[test]
    fn test_first_signal_stops_after_pass() {
        let state = ShutdownState::new();
        assert_eq!(state.handle_signal(), SignalAction::StopAfterPass);
        assert!(state.is_stop_requested());
    }

    #[test]
    fn test_second_signal_exits() {
        let state = ShutdownState::new();
        state.handle_signal();
        assert_eq!(state.handle_signal(), SignalAction::ExitNow);
        assert_eq!(state.handle_signal(), SignalAction::Ignore);
        assert_eq!(state.signal_count(), 3);
    }

    #[test]
    fn test_request_stop() {
        let state = ShutdownState::new();
        state.request_stop();
        assert!(state.is_stop_requested());
        assert_eq!(state.signal_count(), 0);
    }
}
