use lantern::http::request::{Method, RequestBuilder};

#[test]
fn test_request_header_retrieval() {
    let req = RequestBuilder::new()
        .method(Method::GET)
        .path("index.html")
        .header("Host", "example.com")
        .header("Content-Type", "text/html")
        .build()
        .unwrap();

    assert_eq!(req.header("Host"), Some("example.com"));
    assert_eq!(req.header("Content-Type"), Some("text/html"));
    assert_eq!(req.header("Missing"), None);
}

#[test]
fn test_request_header_lookup_ignores_case() {
    let req = RequestBuilder::new()
        .method(Method::POST)
        .path("params_info.html")
        .header("content-length", "15")
        .build()
        .unwrap();

    assert_eq!(req.header("Content-Length"), Some("15"));
    assert_eq!(req.header("CONTENT-LENGTH"), Some("15"));
}

#[test]
fn test_request_method_from_string() {
    assert_eq!(Method::from("GET"), Method::GET);
    assert_eq!(Method::from("HEAD"), Method::HEAD);
    assert_eq!(Method::from("POST"), Method::POST);
    assert_eq!(Method::from("TRACE"), Method::TRACE);
    assert_eq!(Method::from("DELETE"), Method::Unsupported("DELETE".to_string()));
    assert_eq!(Method::from("get"), Method::Unsupported("get".to_string())); // Case-sensitive
}

#[test]
fn test_request_method_display_round_trips_token() {
    assert_eq!(Method::TRACE.to_string(), "TRACE");
    assert_eq!(Method::from("BREW").to_string(), "BREW");
}

#[test]
fn test_builder_synthesizes_raw_head() {
    let req = RequestBuilder::new()
        .method(Method::TRACE)
        .path("index.html")
        .raw_uri("/")
        .header("Header1", "Value1")
        .build()
        .unwrap();

    assert_eq!(req.request_line, "TRACE / HTTP/1.1");
    assert_eq!(req.header_lines, vec!["Header1: Value1".to_string()]);
}

#[test]
fn test_builder_requires_method_and_path() {
    assert!(RequestBuilder::new().path("a").build().is_err());
    assert!(RequestBuilder::new().method(Method::GET).build().is_err());
}

#[test]
fn test_request_with_body() {
    let req = RequestBuilder::new()
        .method(Method::POST)
        .path("params_info.html")
        .body(b"name=Bob".to_vec())
        .build()
        .unwrap();

    assert_eq!(req.body.as_deref(), Some(&b"name=Bob"[..]));
}
