//! Asset directory module
//!
//! Supplies the candidate list for the matcher by listing image files in the
//! configured assets directory.

mod scanner;

pub use scanner::{build_pattern, AssetScanner};
