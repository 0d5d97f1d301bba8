//! Query routes
//!
//! `/{query}` serves the asset that best matches the query, and
//! `{meta_prefix}/{query}` describes it as social-preview metadata.

use std::borrow::Cow;

use hyper::StatusCode;
use serde::Serialize;

use crate::config::AppState;
use crate::handler::router::RequestContext;
use crate::handler::static_files;
use crate::http::{self, HttpResponse};
use crate::logger;

/// Outcome of a query route, including the matched file for access logs
pub struct QueryResponse {
    pub response: HttpResponse,
    pub matched: Option<String>,
}

impl From<HttpResponse> for QueryResponse {
    fn from(response: HttpResponse) -> Self {
        Self {
            response,
            matched: None,
        }
    }
}

/// Path segment that does not decode to UTF-8
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidEncoding;

/// Extract the query from a single-segment path such as `/sunset`
///
/// A trailing slash is tolerated. Returns `None` for `/` and for paths with
/// more than one segment.
pub fn extract_query(path: &str) -> Option<Result<Cow<'_, str>, InvalidEncoding>> {
    let segment = path.strip_prefix('/')?;
    let segment = segment.strip_suffix('/').unwrap_or(segment);
    if segment.is_empty() || segment.contains('/') {
        return None;
    }
    Some(urlencoding::decode(segment).map_err(|_| InvalidEncoding))
}

/// Open Graph block of the metadata response
#[derive(Debug, Serialize)]
pub struct OpenGraph {
    pub images: String,
}

/// Twitter card block of the metadata response
#[derive(Debug, Serialize)]
pub struct TwitterCard {
    pub title: String,
    pub card: &'static str,
    pub images: String,
}

/// Social-preview metadata for a matched asset
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetMetadata {
    pub title: String,
    pub description: Option<String>,
    pub image: String,
    pub open_graph: OpenGraph,
    pub twitter: TwitterCard,
}

impl AssetMetadata {
    pub fn new(file: &str, url_prefix: &str) -> Self {
        let image = format!(
            "{}/{}",
            url_prefix.trim_end_matches('/'),
            urlencoding::encode(file)
        );
        Self {
            title: file.to_string(),
            description: None,
            image: image.clone(),
            open_graph: OpenGraph {
                images: image.clone(),
            },
            twitter: TwitterCard {
                title: file.to_string(),
                card: "summary_large_image",
                images: image,
            },
        }
    }
}

/// Scan the assets directory and match `query` against it
///
/// `Err` carries the response to send when the directory cannot be read.
async fn lookup(
    ctx: &RequestContext<'_>,
    state: &AppState,
    query: &str,
) -> Result<Option<String>, HttpResponse> {
    let files = state.scanner.scan().await.map_err(|e| {
        logger::log_error(&format!("Asset scan failed: {e}"));
        http::build_500_response()
    })?;

    let outcome = state.matcher.find(files.as_slice(), query);
    if ctx.access_log {
        logger::log_match(query, files.len(), &outcome);
    }
    Ok(outcome.name().map(ToString::to_string))
}

/// Serve the asset best matching `query`, or 404
pub async fn serve_image(
    ctx: &RequestContext<'_>,
    state: &AppState,
    query: &str,
) -> QueryResponse {
    match lookup(ctx, state, query).await {
        Ok(Some(name)) => {
            let path = state.scanner.resolve(&name);
            QueryResponse {
                response: static_files::serve_file(ctx, &path).await,
                matched: Some(name),
            }
        }
        Ok(None) => http::build_404_response().into(),
        Err(resp) => resp.into(),
    }
}

/// Describe the asset best matching `query` as JSON metadata, or 404
pub async fn serve_metadata(
    ctx: &RequestContext<'_>,
    state: &AppState,
    query: &str,
) -> QueryResponse {
    match lookup(ctx, state, query).await {
        Ok(Some(name)) => {
            let meta = AssetMetadata::new(&name, &state.config.assets.url_prefix);
            QueryResponse {
                response: http::build_json_response(StatusCode::OK, &meta, ctx.is_head),
                matched: Some(name),
            }
        }
        Ok(None) => http::build_json_response(
            StatusCode::NOT_FOUND,
            &serde_json::json!({ "error": "Not found", "query": query }),
            ctx.is_head,
        )
        .into(),
        Err(resp) => resp.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_single_segment() {
        assert_eq!(extract_query("/cat"), Some(Ok(Cow::Borrowed("cat"))));
        assert_eq!(extract_query("/cat/"), Some(Ok(Cow::Borrowed("cat"))));
        assert_eq!(
            extract_query("/sun%20set").unwrap().unwrap(),
            "sun set"
        );
        assert_eq!(extract_query("/%E6%97%A5%E6%9C%AC").unwrap().unwrap(), "日本");
    }

    #[test]
    fn test_extract_rejects_other_shapes() {
        assert_eq!(extract_query("/"), None);
        assert_eq!(extract_query("//"), None);
        assert_eq!(extract_query("/a/b"), None);
        assert_eq!(extract_query("cat"), None);
        assert_eq!(extract_query("/%FF"), Some(Err(InvalidEncoding)));
    }

    #[test]
    fn test_metadata_shape() {
        let meta = AssetMetadata::new("sun set.png", "/assets/");
        let value = serde_json::to_value(&meta).unwrap();
        assert_eq!(value["title"], "sun set.png");
        assert_eq!(value["image"], "/assets/sun%20set.png");
        assert_eq!(value["openGraph"]["images"], "/assets/sun%20set.png");
        assert_eq!(value["twitter"]["card"], "summary_large_image");
        assert_eq!(value["twitter"]["title"], "sun set.png");
        assert!(value["description"].is_null());
    }
}
