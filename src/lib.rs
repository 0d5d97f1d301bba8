//! picfind: serve the image whose file name best matches a URL path segment.
//!
//! `GET /sunset` returns the asset from the assets directory whose name
//! contains `sunset`, falling back to a fuzzy match for typos.

pub mod assets;
pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod matcher;
pub mod server;

pub use error::{Error, Result};
