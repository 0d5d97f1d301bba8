//! HTTP response building module
//!
//! Builders for the status codes the server emits. A builder failure is
//! logged and replaced by an empty response with the same status.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{
    ACCEPT_RANGES, ALLOW, CACHE_CONTROL, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, ETAG,
};
use hyper::http::response::Builder;
use hyper::{Response, StatusCode};
use serde::Serialize;

use super::cache;

pub type HttpResponse = Response<Full<Bytes>>;

const ALLOWED_METHODS: &str = "GET, HEAD, OPTIONS";

/// Finish a builder, falling back to a bare response on error
fn finish(builder: Builder, status: StatusCode, body: Bytes) -> HttpResponse {
    builder.body(Full::new(body)).unwrap_or_else(|e| {
        crate::logger::log_error(&format!("Failed to build {status} response: {e}"));
        let mut resp = Response::new(Full::new(Bytes::new()));
        *resp.status_mut() = status;
        resp
    })
}

fn text(status: StatusCode, message: &'static str) -> HttpResponse {
    let builder = Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(CONTENT_LENGTH, message.len());
    finish(builder, status, Bytes::from_static(message.as_bytes()))
}

/// Build 304 Not Modified response
pub fn build_304_response(etag: &str) -> HttpResponse {
    let builder = Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header(ETAG, etag)
        .header(CACHE_CONTROL, cache::CACHE_CONTROL);
    finish(builder, StatusCode::NOT_MODIFIED, Bytes::new())
}

/// Build 400 Bad Request response
pub fn build_400_response() -> HttpResponse {
    text(StatusCode::BAD_REQUEST, "Bad Request")
}

/// Build 404 Not Found response
pub fn build_404_response() -> HttpResponse {
    text(StatusCode::NOT_FOUND, "Not found")
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> HttpResponse {
    let builder = Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(ALLOW, ALLOWED_METHODS);
    finish(
        builder,
        StatusCode::METHOD_NOT_ALLOWED,
        Bytes::from_static(b"Method Not Allowed"),
    )
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> HttpResponse {
    text(StatusCode::PAYLOAD_TOO_LARGE, "Payload Too Large")
}

/// Build 416 Range Not Satisfiable response
pub fn build_416_response(file_size: usize) -> HttpResponse {
    let builder = Response::builder()
        .status(StatusCode::RANGE_NOT_SATISFIABLE)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(CONTENT_RANGE, format!("bytes */{file_size}"));
    finish(
        builder,
        StatusCode::RANGE_NOT_SATISFIABLE,
        Bytes::from_static(b"Range Not Satisfiable"),
    )
}

/// Build 500 Internal Server Error response
pub fn build_500_response() -> HttpResponse {
    text(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response(enable_cors: bool) -> HttpResponse {
    let mut builder = Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header(ALLOW, ALLOWED_METHODS);

    if enable_cors {
        builder = builder
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", ALLOWED_METHODS)
            .header("Access-Control-Allow-Headers", "Content-Type, Range")
            .header("Access-Control-Max-Age", "86400");
    }

    finish(builder, StatusCode::NO_CONTENT, Bytes::new())
}

/// Build health check response
pub fn build_health_response(status: &'static str) -> HttpResponse {
    let builder = Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "text/plain")
        .header(CACHE_CONTROL, "no-cache");
    finish(builder, StatusCode::OK, Bytes::from_static(status.as_bytes()))
}

/// Build JSON response
pub fn build_json_response<T: Serialize>(status: StatusCode, body: &T, is_head: bool) -> HttpResponse {
    let json = match serde_json::to_vec_pretty(body) {
        Ok(j) => j,
        Err(e) => {
            crate::logger::log_error(&format!("Failed to serialize response: {e}"));
            return build_500_response();
        }
    };

    let builder = Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "application/json")
        .header(CONTENT_LENGTH, json.len());
    let body = if is_head { Bytes::new() } else { Bytes::from(json) };
    finish(builder, status, body)
}

/// Build 200 response for file content with cache headers
pub fn build_cached_response(
    data: Bytes,
    content_type: &str,
    etag: &str,
    is_head: bool,
) -> HttpResponse {
    let builder = Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, data.len())
        .header(ACCEPT_RANGES, "bytes")
        .header(ETAG, etag)
        .header(CACHE_CONTROL, cache::CACHE_CONTROL);
    let body = if is_head { Bytes::new() } else { data };
    finish(builder, StatusCode::OK, body)
}

/// Build 206 Partial Content response; `data` is the selected slice
pub fn build_partial_response(
    data: Bytes,
    content_type: &str,
    etag: &str,
    start: usize,
    end: usize,
    total_size: usize,
    is_head: bool,
) -> HttpResponse {
    let builder = Response::builder()
        .status(StatusCode::PARTIAL_CONTENT)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, end - start + 1)
        .header(CONTENT_RANGE, format!("bytes {start}-{end}/{total_size}"))
        .header(ACCEPT_RANGES, "bytes")
        .header(ETAG, etag)
        .header(CACHE_CONTROL, cache::CACHE_CONTROL);
    let body = if is_head { Bytes::new() } else { data };
    finish(builder, StatusCode::PARTIAL_CONTENT, body)
}
