//! Tests for per-method response generation

use lantern::config::ServerConfig;
use lantern::handlers::form::render_params_page;
use lantern::handlers::{Context, handle};
use lantern::http::request::{Method, Request, RequestBuilder};
use lantern::http::response::StatusCode;
use std::collections::BTreeMap;
use std::fs;
use tempfile::TempDir;

fn context() -> (TempDir, Context) {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("file.txt"), b"hello").unwrap();
    fs::write(dir.path().join("index.html"), b"<h1>home</h1>").unwrap();
    fs::write(dir.path().join("logo.png"), [0x89, b'P', b'N', b'G']).unwrap();
    fs::write(dir.path().join("favicon.ico"), [0, 0, 1, 0]).unwrap();
    fs::create_dir(dir.path().join("docs")).unwrap();

    let cfg = ServerConfig::from_yaml_str(&format!("root: {}\n", dir.path().display())).unwrap();
    let ctx = Context::new(cfg).unwrap();
    (dir, ctx)
}

fn request(method: Method, path: &str) -> Request {
    RequestBuilder::new().method(method).path(path).build().unwrap()
}

#[tokio::test]
async fn test_get_existing_file() {
    let (_dir, ctx) = context();

    let response = handle(&request(Method::GET, "file.txt"), &ctx).await;

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.header("Content-Type"), Some("application/octet-stream"));
    assert_eq!(response.header("Content-Length"), Some("5"));
    assert_eq!(&response.body[..], b"hello");
}

#[tokio::test]
async fn test_get_probes_content_types() {
    let (_dir, ctx) = context();

    for (path, expected) in [
        ("index.html", "text/html"),
        ("logo.png", "image"),
        ("favicon.ico", "icon"),
    ] {
        let response = handle(&request(Method::GET, path), &ctx).await;
        assert_eq!(response.header("Content-Type"), Some(expected), "{path}");
    }
}

#[tokio::test]
async fn test_get_missing_file() {
    let (_dir, ctx) = context();

    let response = handle(&request(Method::GET, "nonexistent.txt"), &ctx).await;

    assert_eq!(response.status, StatusCode::NotFound);
    assert_eq!(
        &response.body[..],
        b"<html><body><h1>404 Not Found</h1></body></html>"
    );
}

#[tokio::test]
async fn test_get_directory_is_not_found() {
    let (_dir, ctx) = context();

    let response = handle(&request(Method::GET, "docs"), &ctx).await;

    assert_eq!(response.status, StatusCode::NotFound);
}

#[tokio::test]
async fn test_get_traversal_is_forbidden() {
    let (_dir, ctx) = context();

    let response = handle(&request(Method::GET, "../../etc/passwd"), &ctx).await;

    assert_eq!(response.status, StatusCode::Forbidden);
    assert_eq!(
        &response.body[..],
        b"<html><body><h1>403 Forbidden</h1></body></html>"
    );
}

#[tokio::test]
async fn test_get_is_idempotent() {
    let (_dir, ctx) = context();
    let req = request(Method::GET, "index.html");

    let first = handle(&req, &ctx).await;
    let second = handle(&req, &ctx).await;

    assert_eq!(first.headers, second.headers);
    assert_eq!(first.body, second.body);
}

#[tokio::test]
async fn test_head_matches_get_without_body() {
    let (_dir, ctx) = context();

    let get = handle(&request(Method::GET, "index.html"), &ctx).await;
    let head = handle(&request(Method::HEAD, "index.html"), &ctx).await;

    assert_eq!(head.status, StatusCode::Ok);
    assert_eq!(head.header("Content-Length"), get.header("Content-Length"));
    assert_eq!(head.header("Content-Type"), Some("text/html"));
    assert!(head.header("Date").unwrap().ends_with(" GMT"));
    assert!(head.body.is_empty());
}

#[tokio::test]
async fn test_head_errors_follow_get() {
    let (_dir, ctx) = context();

    let missing = handle(&request(Method::HEAD, "missing.html"), &ctx).await;
    let outside = handle(&request(Method::HEAD, "../x"), &ctx).await;

    assert_eq!(missing.status, StatusCode::NotFound);
    assert_eq!(outside.status, StatusCode::Forbidden);
}

#[tokio::test]
async fn test_post_echoes_form_fields() {
    let (_dir, ctx) = context();
    let req = RequestBuilder::new()
        .method(Method::POST)
        .path("params_info.html")
        .header("Content-Length", "15")
        .body(b"name=Bob&age=30".to_vec())
        .build()
        .unwrap();

    let response = handle(&req, &ctx).await;
    let html = String::from_utf8_lossy(&response.body);

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.header("Content-Type"), Some("text/html"));
    assert!(html.contains("name: Bob"));
    assert!(html.contains("age: 30"));
}

#[tokio::test]
async fn test_post_merges_query_parameters() {
    let (_dir, ctx) = context();
    let req = RequestBuilder::new()
        .method(Method::POST)
        .path("params_info.html")
        .query_param("source", "query")
        .query_param("name", "Alice")
        .body(b"name=Bob&city=Rome".to_vec())
        .build()
        .unwrap();

    let response = handle(&req, &ctx).await;
    let html = String::from_utf8_lossy(&response.body);

    assert!(html.contains("source: query"));
    assert!(html.contains("city: Rome"));
    assert!(html.contains("name: Alice"));
    assert!(!html.contains("name: Bob"));
}

#[tokio::test]
async fn test_post_to_other_path_is_not_found() {
    let (_dir, ctx) = context();
    let req = RequestBuilder::new()
        .method(Method::POST)
        .path("index.html")
        .body(b"a=1".to_vec())
        .build()
        .unwrap();

    let response = handle(&req, &ctx).await;

    assert_eq!(response.status, StatusCode::NotFound);
}

#[tokio::test]
async fn test_post_without_body_requires_length() {
    let (_dir, ctx) = context();

    let response = handle(&request(Method::POST, "params_info.html"), &ctx).await;

    assert_eq!(response.status, StatusCode::LengthRequired);
    assert_eq!(
        &response.body[..],
        b"<html><body><h1>411 Length Required</h1></body></html>"
    );
}

#[tokio::test]
async fn test_trace_echoes_head() {
    let (_dir, ctx) = context();
    let req = RequestBuilder::new()
        .method(Method::TRACE)
        .path("index.html")
        .raw_uri("/")
        .header("Header1", "Value1")
        .build()
        .unwrap();

    let response = handle(&req, &ctx).await;

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.header("Content-Type"), Some("message/http"));
    assert_eq!(&response.body[..], b"TRACE / HTTP/1.1\r\nHeader1: Value1\r\n");
}

#[tokio::test]
async fn test_unsupported_method_is_not_implemented() {
    let (_dir, ctx) = context();

    let response = handle(&request(Method::from("DELETE"), "file.txt"), &ctx).await;

    assert_eq!(response.status, StatusCode::NotImplemented);
}

#[test]
fn test_render_params_page_layout() {
    let mut params = BTreeMap::new();
    params.insert("b".to_string(), "2".to_string());
    params.insert("a".to_string(), "<i>1</i>".to_string());

    assert_eq!(
        render_params_page(&params),
        "<!DOCTYPE html><html><body><h2>Form Submission Details</h2>\
         <p>a: <i>1</i></p><p>b: 2</p></body></html>"
    );
}
