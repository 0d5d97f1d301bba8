//! Server loop module
//!
//! Accepts connections until the shutdown notification fires, then waits a
//! bounded time for open connections to finish.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Run the accept loop on `listener`
///
/// Returns once `state.shutdown` is notified and either every connection
/// has closed or `performance.shutdown_timeout` has elapsed. Connection
/// tasks live in the caller's `LocalSet`, so any still open are aborted
/// when that set is dropped.
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    active_connections: Arc<AtomicUsize>,
) {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            () = state.shutdown.notified() => {
                break;
            }
        }
    }

    drop(listener);

    let timeout_secs = state.config.performance.shutdown_timeout;
    logger::log_shutdown(active_connections.load(Ordering::SeqCst), timeout_secs);
    let remaining =
        wait_for_connections(&active_connections, Duration::from_secs(timeout_secs)).await;
    logger::log_shutdown_complete(remaining);
}

/// Wait until the counter reaches zero or `timeout` elapses
///
/// Returns the number of connections still open.
async fn wait_for_connections(active_connections: &AtomicUsize, timeout: Duration) -> usize {
    let drained = async {
        while active_connections.load(Ordering::SeqCst) > 0 {
            tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
        }
    };
    // Elapsed just means connections remain; the count below reports them
    let _ = tokio::time::timeout(timeout, drained).await;
    active_connections.load(Ordering::SeqCst)
}
