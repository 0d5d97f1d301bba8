// Application state module
// Shared, read-mostly state handed to every connection

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

use super::types::Config;
use crate::assets::{build_pattern, AssetScanner};
use crate::error::Result;
use crate::matcher::Matcher;

/// Application state
pub struct AppState {
    pub config: Config,
    pub scanner: AssetScanner,
    pub matcher: Matcher,
    /// Notified once on SIGINT/SIGTERM
    pub shutdown: Arc<Notify>,

    // Cached config values for fast access without locks
    pub cached_access_log: AtomicBool,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        let pattern = build_pattern(&config.assets.extensions)?;
        let scanner = AssetScanner::new(
            &config.assets.dir,
            pattern,
            Duration::from_secs(config.assets.cache_ttl_secs),
        );

        Ok(Self {
            config: config.clone(),
            scanner,
            matcher: Matcher::new(config.fuzzy_options()),
            shutdown: Arc::new(Notify::new()),
            cached_access_log: AtomicBool::new(config.logging.access_log),
        })
    }
}
