//! Crate error type
//!
//! Request handling never fails outward (every failure becomes an HTTP
//! response); these errors cover startup and the asset scanner.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid address '{addr}': {source}")]
    Address {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("invalid asset pattern: {0}")]
    Pattern(#[from] globset::Error),

    #[error("cannot read assets directory '{}': {source}", path.display())]
    AssetDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
