//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, route
//! matching, dispatching and access logging.

use crate::config::{AppState, RoutesConfig};
use crate::handler::query::{self, QueryResponse};
use crate::handler::static_files;
use crate::http::{self, HttpResponse};
use crate::logger::{self, AccessLogEntry};
use hyper::body::Body as _;
use hyper::header::{HeaderValue, SERVER};
use hyper::{Method, Request};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
    pub range_header: Option<String>,
    pub access_log: bool,
}

/// Main entry point for HTTP request handling
///
/// Generic over the body type since request bodies are never read.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<HttpResponse, Infallible> {
    let started = Instant::now();
    let method = req.method();
    let uri = req.uri();
    let access_log = state.cached_access_log.load(Ordering::Relaxed);

    logger::log_headers_count(req.headers().len(), state.config.logging.show_headers);

    let routed = if let Some(resp) = check_http_method(method, state.config.http.enable_cors) {
        resp.into()
    } else if let Some(resp) = check_body_size(&req, state.config.http.max_body_size) {
        resp.into()
    } else {
        let ctx = RequestContext {
            path: uri.path(),
            is_head: *method == Method::HEAD,
            if_none_match: header_string(&req, "if-none-match"),
            range_header: header_string(&req, "range"),
            access_log,
        };
        route_request(&ctx, &state).await
    };

    let QueryResponse {
        mut response,
        matched,
    } = routed;

    if let Ok(value) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, value);
    }

    if access_log {
        let mut entry = AccessLogEntry::new(
            peer_addr.ip().to_string(),
            method.to_string(),
            uri.path().to_string(),
        );
        entry.query = uri.query().map(ToString::to_string);
        entry.http_version = http_version_label(req.version()).to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = usize::try_from(response.body().size_hint().exact().unwrap_or(0))
            .unwrap_or(usize::MAX);
        entry.referer = header_string(&req, "referer");
        entry.user_agent = header_string(&req, "user-agent");
        entry.matched = matched;
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

fn header_string<B>(req: &Request<B>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

const fn http_version_label(version: hyper::Version) -> &'static str {
    match version {
        hyper::Version::HTTP_09 => "0.9",
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        hyper::Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method, enable_cors: bool) -> Option<HttpResponse> {
    match method {
        &Method::GET | &Method::HEAD => None,
        &Method::OPTIONS => Some(http::build_options_response(enable_cors)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<HttpResponse> {
    let size_str = req.headers().get("content-length")?.to_str().ok()?;
    match size_str.parse::<u64>() {
        Ok(size) if size > max_body_size => {
            logger::log_error(&format!(
                "Request body too large: {size} bytes (max: {max_body_size})"
            ));
            Some(http::build_413_response())
        }
        Ok(_) => None,
        Err(_) => {
            logger::log_warning(&format!(
                "Invalid Content-Length value: '{size_str}', skipping size check"
            ));
            None
        }
    }
}

/// Strip the metadata prefix, leaving `/{query}` for the query extractor
fn strip_meta_prefix<'a>(path: &'a str, routes: &RoutesConfig) -> Option<&'a str> {
    let prefix = routes.meta_prefix.trim_end_matches('/');
    path.strip_prefix(prefix).filter(|rest| rest.starts_with('/'))
}

/// Route request based on path and configuration
///
/// Order: health probes, public files, metadata, image by query.
pub async fn route_request(ctx: &RequestContext<'_>, state: &AppState) -> QueryResponse {
    let routes = &state.config.routes;

    // 1. Health check endpoints
    if routes.health.enabled
        && (ctx.path == routes.health.liveness_path || ctx.path == routes.health.readiness_path)
    {
        return http::build_health_response("ok").into();
    }

    // 2. Files under the public directory win over query matching
    if let Some(path) =
        static_files::resolve_public_path(&state.config.assets.public_dir, ctx.path).await
    {
        return static_files::serve_file(ctx, &path).await.into();
    }

    // 3. Metadata for a query
    if let Some(rest) = strip_meta_prefix(ctx.path, routes) {
        return match query::extract_query(rest) {
            Some(Ok(q)) => query::serve_metadata(ctx, state, &q).await,
            Some(Err(_)) => http::build_400_response().into(),
            None => http::build_404_response().into(),
        };
    }

    // 4. Image for a query
    match query::extract_query(ctx.path) {
        Some(Ok(q)) => query::serve_image(ctx, state, &q).await,
        Some(Err(_)) => http::build_400_response().into(),
        None => http::build_404_response().into(),
    }
}
