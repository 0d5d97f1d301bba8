// Configuration module entry point
// Loads layered configuration and builds the shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

use crate::error::{Error, Result};
use crate::matcher::FuzzyOptions;

// Re-export public types
pub use state::AppState;
pub use types::{
    AssetsConfig, Config, HealthConfig, HttpConfig, LoggingConfig, MatcherConfig,
    PerformanceConfig, RoutesConfig, ServerConfig,
};

/// Default config file name (extension resolved by the `config` crate)
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from specified file path
    ///
    /// Precedence, lowest first: defaults, config file, `PICFIND__*`
    /// environment variables, then a bare `PORT` variable.
    pub fn load_from(config_path: &str) -> Result<Self> {
        Self::build(config_path, std::env::var("PORT").ok())
    }

    pub(crate) fn build(config_path: &str, port_override: Option<String>) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("PICFIND")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .set_override_option("server.port", port_override)?
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5173)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.show_headers", false)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("performance.shutdown_timeout", 10)?
            .set_default("http.server_name", concat!("picfind/", env!("CARGO_PKG_VERSION")))?
            .set_default("http.enable_cors", false)?
            .set_default("http.max_body_size", 10_485_760)? // 10MB
            .set_default("assets.dir", "./public/assets")?
            .set_default("assets.public_dir", "./public")?
            .set_default("assets.extensions", vec!["png", "jpg", "jpeg", "gif", "svg"])?
            .set_default("assets.cache_ttl_secs", 0)?
            .set_default("assets.url_prefix", "/assets")?
            .set_default("matcher.threshold", 0.6)?
            .set_default("matcher.distance", 100)?
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the matcher and scanner cannot work with
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.matcher.threshold) {
            return Err(Error::InvalidConfig(format!(
                "matcher.threshold must be within [0, 1], got {}",
                self.matcher.threshold
            )));
        }
        if self.matcher.distance == 0 {
            return Err(Error::InvalidConfig(
                "matcher.distance must be greater than 0".to_string(),
            ));
        }
        if self.assets.extensions.iter().all(|e| e.trim().is_empty()) {
            return Err(Error::InvalidConfig(
                "assets.extensions must name at least one extension".to_string(),
            ));
        }
        if !self.routes.meta_prefix.starts_with('/') || self.routes.meta_prefix.len() < 2 {
            return Err(Error::InvalidConfig(format!(
                "routes.meta_prefix must be an absolute path, got '{}'",
                self.routes.meta_prefix
            )));
        }
        Ok(())
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse().map_err(|source| Error::Address { addr, source })
    }

    pub const fn fuzzy_options(&self) -> FuzzyOptions {
        FuzzyOptions {
            threshold: self.matcher.threshold,
            distance: self.matcher.distance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(dir: &tempfile::TempDir, body: &str) -> String {
        let path = dir.path().join("picfind.toml");
        std::fs::write(&path, body).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let cfg = Config::build(&missing.to_string_lossy(), None).unwrap();

        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.assets.dir, "./public/assets");
        assert_eq!(cfg.assets.extensions, vec!["png", "jpg", "jpeg", "gif", "svg"]);
        assert_eq!(cfg.assets.cache_ttl_secs, 0);
        assert!((cfg.matcher.threshold - 0.6).abs() < f64::EPSILON);
        assert_eq!(cfg.matcher.distance, 100);
        assert_eq!(cfg.routes.meta_prefix, "/meta");
        assert!(cfg.routes.health.enabled);
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert_eq!(cfg.performance.shutdown_timeout, 10);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            r#"
[server]
port = 9090

[assets]
dir = "/srv/images"
extensions = ["png"]

[matcher]
threshold = 0.4
"#,
        );
        let cfg = Config::build(&path, None).unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.assets.dir, "/srv/images");
        assert_eq!(cfg.assets.extensions, vec!["png"]);
        assert!((cfg.matcher.threshold - 0.4).abs() < f64::EPSILON);
        assert_eq!(cfg.assets.public_dir, "./public");
    }

    #[test]
    fn test_port_override_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "[server]\nport = 9090\n");
        let cfg = Config::build(&path, Some("3000".to_string())).unwrap();
        assert_eq!(cfg.server.port, 3000);
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "[matcher]\nthreshold = 1.5\n");
        assert!(matches!(
            Config::build(&path, None),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_zero_distance_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "[matcher]\ndistance = 0\n");
        assert!(matches!(
            Config::build(&path, None),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_socket_addr() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = Config::build(&dir.path().join("none").to_string_lossy(), None).unwrap();
        cfg.server.port = 8081;
        assert_eq!(cfg.get_socket_addr().unwrap().port(), 8081);

        cfg.server.host = "not a host".to_string();
        assert!(matches!(cfg.get_socket_addr(), Err(Error::Address { .. })));
    }
}
