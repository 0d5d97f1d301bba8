//! End-to-end routing through `handle_request` against a temporary site

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use http_body_util::BodyExt;
use hyper::body::Bytes;
use hyper::{Method, Request, StatusCode};
use picfind::config::{AppState, Config};
use picfind::handler::handle_request;
use picfind::http::HttpResponse;

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nsunset";

struct Site {
    _dir: tempfile::TempDir,
    state: Arc<AppState>,
}

fn write_site(root: &Path) {
    let assets = root.join("public/assets");
    std::fs::create_dir_all(&assets).unwrap();
    std::fs::write(root.join("public/index.html"), "<h1>picfind</h1>").unwrap();
    std::fs::write(assets.join("sunset.png"), PNG_BYTES).unwrap();
    std::fs::write(assets.join("cat.jpg"), b"jpeg").unwrap();
    std::fs::write(assets.join("readme.txt"), b"not an image").unwrap();
}

fn site_with_assets_dir(assets_dir: &str) -> Site {
    let dir = tempfile::tempdir().unwrap();
    write_site(dir.path());

    let public = dir.path().join("public");
    let assets = if assets_dir.is_empty() {
        public.join("assets")
    } else {
        dir.path().join(assets_dir)
    };
    let config_path = dir.path().join("picfind.toml");
    std::fs::write(
        &config_path,
        format!(
            "[logging]\naccess_log = false\n\n[assets]\ndir = '{}'\npublic_dir = '{}'\n",
            assets.display(),
            public.display()
        ),
    )
    .unwrap();

    let cfg = Config::load_from(&config_path.to_string_lossy()).unwrap();
    let state = Arc::new(AppState::new(&cfg).unwrap());
    Site { _dir: dir, state }
}

fn site() -> Site {
    site_with_assets_dir("")
}

async fn send(site: &Site, method: Method, path: &str) -> HttpResponse {
    let req = Request::builder().method(method).uri(path).body(()).unwrap();
    let peer: SocketAddr = "127.0.0.1:40000".parse().unwrap();
    handle_request(req, Arc::clone(&site.state), peer).await.unwrap()
}

async fn body(resp: HttpResponse) -> Bytes {
    resp.into_body().collect().await.unwrap().to_bytes()
}

fn header<'a>(resp: &'a HttpResponse, name: &str) -> &'a str {
    resp.headers().get(name).unwrap().to_str().unwrap()
}

#[tokio::test]
async fn serves_contained_match() {
    let site = site();
    let resp = send(&site, Method::GET, "/sunset").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(header(&resp, "content-type"), "image/png");
    assert!(resp.headers().contains_key("etag"));
    assert_eq!(body(resp).await, PNG_BYTES);
}

#[tokio::test]
async fn containment_ignores_case_and_trailing_slash() {
    let site = site();
    let resp = send(&site, Method::GET, "/CAT/").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(header(&resp, "content-type"), "image/jpeg");
}

#[tokio::test]
async fn serves_fuzzy_match_for_typo() {
    let site = site();
    let resp = send(&site, Method::GET, "/sunsett").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body(resp).await, PNG_BYTES);
}

#[tokio::test]
async fn unmatched_query_is_404() {
    let site = site();
    let resp = send(&site, Method::GET, "/zzzzzz").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body(resp).await, "Not found");
}

#[tokio::test]
async fn non_image_files_are_not_candidates() {
    let site = site();
    let resp = send(&site, Method::GET, "/readme").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn head_has_headers_without_body() {
    let site = site();
    let resp = send(&site, Method::HEAD, "/sunset").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        header(&resp, "content-length"),
        PNG_BYTES.len().to_string()
    );
    assert!(body(resp).await.is_empty());
}

#[tokio::test]
async fn public_files_win_over_queries() {
    let site = site();
    let index = send(&site, Method::GET, "/").await;
    assert_eq!(index.status(), StatusCode::OK);
    assert_eq!(header(&index, "content-type"), "text/html; charset=utf-8");

    let direct = send(&site, Method::GET, "/assets/cat.jpg").await;
    assert_eq!(direct.status(), StatusCode::OK);
    assert_eq!(body(direct).await, "jpeg");
}

#[tokio::test]
async fn metadata_describes_match() {
    let site = site();
    let resp = send(&site, Method::GET, "/meta/cat").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(header(&resp, "content-type"), "application/json");

    let json: serde_json::Value = serde_json::from_slice(&body(resp).await).unwrap();
    assert_eq!(json["title"], "cat.jpg");
    assert_eq!(json["image"], "/assets/cat.jpg");
    assert_eq!(json["openGraph"]["images"], "/assets/cat.jpg");
    assert_eq!(json["twitter"]["card"], "summary_large_image");
}

#[tokio::test]
async fn metadata_for_unmatched_query_is_404() {
    let site = site();
    let resp = send(&site, Method::GET, "/meta/zzzzzz").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let json: serde_json::Value = serde_json::from_slice(&body(resp).await).unwrap();
    assert_eq!(json["query"], "zzzzzz");
}

#[tokio::test]
async fn other_shapes_and_methods() {
    let site = site();
    assert_eq!(send(&site, Method::GET, "/a/b").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(send(&site, Method::GET, "/%FF").await.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        send(&site, Method::POST, "/sunset").await.status(),
        StatusCode::METHOD_NOT_ALLOWED
    );
    assert_eq!(
        send(&site, Method::OPTIONS, "/sunset").await.status(),
        StatusCode::NO_CONTENT
    );
}

#[tokio::test]
async fn health_and_server_header() {
    let site = site();
    let resp = send(&site, Method::GET, "/healthz").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(header(&resp, "server").starts_with("picfind/"));
    assert_eq!(body(resp).await, "ok");
}

#[tokio::test]
async fn missing_assets_dir_is_500() {
    let site = site_with_assets_dir("nowhere");
    let resp = send(&site, Method::GET, "/sunset").await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
