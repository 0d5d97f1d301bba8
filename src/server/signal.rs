//! Signal handling module
//!
//! | Signal  | Action                       |
//! |---------|------------------------------|
//! | SIGHUP  | Drop the cached asset list   |
//! | SIGTERM | Graceful shutdown            |
//! | SIGINT  | Graceful shutdown (Ctrl+C)   |

use std::sync::Arc;

use crate::config::AppState;
use crate::logger;

/// Start the signal listener task (Unix)
///
/// Shutdown uses `notify_one` so the permit is kept even if the accept loop
/// is not parked on `notified()` at that instant.
#[cfg(unix)]
pub fn start_signal_handler(state: Arc<AppState>) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::task::spawn_local(async move {
        let registered = (
            signal(SignalKind::hangup()),
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        );
        let (mut sighup, mut sigterm, mut sigint) = match registered {
            (Ok(hup), Ok(term), Ok(int)) => (hup, term, int),
            (hup, term, int) => {
                for err in [hup.err(), term.err(), int.err()].into_iter().flatten() {
                    logger::log_error(&format!("Failed to register signal handler: {err}"));
                }
                return;
            }
        };

        logger::log_info(&format!(
            "Signal handlers registered (pid {}): HUP rescans assets, TERM/INT shut down",
            std::process::id()
        ));

        loop {
            tokio::select! {
                _ = sighup.recv() => {
                    logger::log_signal("SIGHUP", "invalidating asset cache");
                    state.scanner.invalidate().await;
                }
                _ = sigterm.recv() => {
                    logger::log_signal("SIGTERM", "shutting down");
                    state.shutdown.notify_one();
                    break;
                }
                _ = sigint.recv() => {
                    logger::log_signal("SIGINT", "shutting down");
                    state.shutdown.notify_one();
                    break;
                }
            }
        }
    });
}

/// Windows fallback: only Ctrl+C is handled
#[cfg(not(unix))]
pub fn start_signal_handler(state: Arc<AppState>) {
    tokio::task::spawn_local(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            logger::log_signal("Ctrl+C", "shutting down");
            state.shutdown.notify_one();
        }
    });
}
