//! Static file serving module
//!
//! Loads files from disk and builds responses with `ETag` and Range support.
//! Used for the public directory and for matched assets.

use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime, range::RangeParseResult, HttpResponse};
use crate::logger;
use hyper::body::Bytes;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

const INDEX_FILE: &str = "index.html";

/// Resolve a request path inside `root`, refusing anything that escapes it
///
/// Directories (including `/`) resolve to their `index.html`. Returns `None`
/// when nothing servable exists at the path.
pub async fn resolve_public_path(root: &str, request_path: &str) -> Option<PathBuf> {
    let decoded = urlencoding::decode(request_path).ok()?;
    let relative = decoded.trim_start_matches('/');

    let root_canonical = match fs::canonicalize(root).await {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Public directory not found or inaccessible '{root}': {e}"
            ));
            return None;
        }
    };

    let mut candidate = Path::new(root).join(relative);
    if relative.is_empty() || fs::metadata(&candidate).await.is_ok_and(|m| m.is_dir()) {
        candidate = candidate.join(INDEX_FILE);
    }

    // Missing files are the common case, not worth logging
    let canonical = fs::canonicalize(&candidate).await.ok()?;
    if !canonical.starts_with(&root_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {request_path} -> {}",
            canonical.display()
        ));
        return None;
    }

    fs::metadata(&canonical)
        .await
        .is_ok_and(|m| m.is_file())
        .then_some(canonical)
}

/// Serve a file from disk
///
/// A file that vanished between lookup and read is a 404; any other read
/// error is a 500.
pub async fn serve_file(ctx: &RequestContext<'_>, path: &Path) -> HttpResponse {
    match fs::read(path).await {
        Ok(content) => build_file_response(
            content,
            mime::content_type_for(path),
            ctx.if_none_match.as_deref(),
            ctx.is_head,
            ctx.range_header.as_deref(),
        ),
        Err(e) if e.kind() == ErrorKind::NotFound => http::build_404_response(),
        Err(e) => {
            logger::log_error(&format!("Failed to read file '{}': {e}", path.display()));
            http::build_500_response()
        }
    }
}

/// Build file response with `ETag` and Range support
pub fn build_file_response(
    data: Vec<u8>,
    content_type: &str,
    if_none_match: Option<&str>,
    is_head: bool,
    range_header: Option<&str>,
) -> HttpResponse {
    let etag = cache::generate_etag(&data);
    let total_size = data.len();

    if cache::check_etag_match(if_none_match, &etag) {
        return http::build_304_response(&etag);
    }

    match http::parse_range_header(range_header, total_size) {
        RangeParseResult::Valid(range) => {
            let (start, end) = (*range.start(), *range.end());
            let body = if is_head {
                Bytes::new()
            } else {
                Bytes::copy_from_slice(&data[range])
            };
            http::response::build_partial_response(
                body,
                content_type,
                &etag,
                start,
                end,
                total_size,
                is_head,
            )
        }
        RangeParseResult::NotSatisfiable => http::build_416_response(total_size),
        RangeParseResult::None => {
            http::response::build_cached_response(Bytes::from(data), content_type, &etag, is_head)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::StatusCode;

    #[tokio::test]
    async fn test_resolve_file_and_index() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html></html>").unwrap();
        std::fs::create_dir(dir.path().join("assets")).unwrap();
        std::fs::write(dir.path().join("assets/cat one.png"), b"png").unwrap();
        let root = dir.path().to_string_lossy().into_owned();

        let index = resolve_public_path(&root, "/").await.unwrap();
        assert!(index.ends_with("index.html"));

        let cat = resolve_public_path(&root, "/assets/cat%20one.png").await.unwrap();
        assert!(cat.ends_with("cat one.png"));

        assert!(resolve_public_path(&root, "/assets").await.is_none());
        assert!(resolve_public_path(&root, "/cat").await.is_none());
    }

    #[tokio::test]
    async fn test_resolve_blocks_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let public = dir.path().join("public");
        std::fs::create_dir(&public).unwrap();
        std::fs::write(dir.path().join("secret.txt"), "secret").unwrap();
        let root = public.to_string_lossy().into_owned();

        assert!(resolve_public_path(&root, "/../secret.txt").await.is_none());
        assert!(resolve_public_path(&root, "/%2e%2e/secret.txt").await.is_none());
    }

    #[tokio::test]
    async fn test_resolve_missing_root() {
        assert!(resolve_public_path("/definitely/not/here", "/x.png").await.is_none());
    }

    #[test]
    fn test_file_response_full_and_conditional() {
        let data = b"image-bytes".to_vec();
        let resp = build_file_response(data.clone(), "image/png", None, false, None);
        assert_eq!(resp.status(), StatusCode::OK);
        let etag = resp.headers().get("etag").unwrap().to_str().unwrap().to_string();

        let cached = build_file_response(data, "image/png", Some(&etag), false, None);
        assert_eq!(cached.status(), StatusCode::NOT_MODIFIED);
    }

    #[test]
    fn test_file_response_ranges() {
        let data = b"0123456789".to_vec();
        let partial = build_file_response(data.clone(), "image/gif", None, false, Some("bytes=2-5"));
        assert_eq!(partial.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(partial.headers().get("content-range").unwrap(), "bytes 2-5/10");

        let bad = build_file_response(data, "image/gif", None, false, Some("bytes=50-"));
        assert_eq!(bad.status(), StatusCode::RANGE_NOT_SATISFIABLE);
    }
}
