//! Request handler module
//!
//! Request routing dispatch: public static files, image lookup by query and
//! the metadata endpoint.

pub mod query;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
