//! HTTP protocol layer module
//!
//! Protocol helpers shared by the static file and image routes, decoupled
//! from matching logic.

pub mod cache;
pub mod mime;
pub mod range;
pub mod response;

// Re-export commonly used types
pub use range::{parse_range_header, RangeParseResult};
pub use response::{
    build_304_response, build_400_response, build_404_response, build_405_response, build_413_response,
    build_416_response, build_500_response, build_health_response, build_json_response,
    build_options_response, HttpResponse,
};
