//! Logger module
//!
//! Logging utilities for the server:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Match decisions
//! - Error and warning logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;
pub use writer::Level;

use crate::config::Config;
use crate::matcher::MatchOutcome;
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
        Level::parse(&config.logging.level),
    )
}

fn enabled(level: Level) -> bool {
    writer::get().map_or(true, |w| level <= w.level())
}

/// Write to info log (shares the access log target)
fn write_info(message: &str) {
    if !enabled(Level::Info) {
        return;
    }
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

/// Write to error log
fn write_error(level: Level, message: &str) {
    if !enabled(level) {
        return;
    }
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write_info("======================================");
    write_info("picfind started successfully");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    write_info(&format!("Assets directory: {}", config.assets.dir));
    write_info(&format!("Public directory: {}", config.assets.public_dir));
    write_info(&format!(
        "Matchable extensions: {}",
        config.assets.extensions.join(", ")
    ));
    write_info(&format!(
        "Fuzzy threshold: {} (distance {})",
        config.matcher.threshold, config.matcher.distance
    ));
    if config.assets.cache_ttl_secs > 0 {
        write_info(&format!(
            "Asset listing cached for {}s",
            config.assets.cache_ttl_secs
        ));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("======================================\n");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    if enabled(Level::Debug) {
        write_info(&format!("[Connection] Accepted from: {peer_addr}"));
    }
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(
        Level::Error,
        &format!("[ERROR] Failed to serve connection: {err:?}"),
    );
}

pub fn log_error(message: &str) {
    write_error(Level::Error, &format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(Level::Warn, &format!("[WARN] {message}"));
}

pub fn log_info(message: &str) {
    write_info(&format!("[INFO] {message}"));
}

pub fn log_headers_count(count: usize, show: bool) {
    if show {
        write_info(&format!("[Headers] Count: {count}"));
    }
}

/// Log the outcome of matching `query` against `candidates` files
pub fn log_match(query: &str, candidates: usize, outcome: &MatchOutcome<'_>) {
    let line = match outcome {
        MatchOutcome::Found { name, stage, score } => format!(
            "[Match] '{query}' -> '{name}' ({stage}, score {score:.3}, {candidates} candidates)"
        ),
        MatchOutcome::NotFound => {
            format!("[Match] '{query}' -> not found ({candidates} candidates)")
        }
    };
    write_info(&line);
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    if let Some(w) = writer::get() {
        w.write_access(&entry.format(format));
    } else {
        println!("{}", entry.format(format));
    }
}

pub fn log_signal(name: &str, action: &str) {
    write_info(&format!("[SIGNAL] {name} received: {action}"));
}

pub fn log_shutdown(active_connections: usize, timeout_secs: u64) {
    write_info(&format!(
        "[Shutdown] Listener closed, waiting up to {timeout_secs}s for {active_connections} connection(s)"
    ));
}

pub fn log_shutdown_complete(aborted_connections: usize) {
    if aborted_connections == 0 {
        write_info("[Shutdown] All connections closed");
    } else {
        write_info(&format!(
            "[Shutdown] Aborting {aborted_connections} connection(s) still open"
        ));
    }
}
