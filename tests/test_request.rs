use gopherd::gopher::request::{MAX_REQUEST_LEN, Request, RequestKind};

#[test]
fn test_parse_strips_crlf() {
    let req = Request::parse(b"/docs/readme.txt\r\n");
    assert_eq!(req.as_bytes(), b"/docs/readme.txt");
}

#[test]
fn test_parse_strips_lf_and_lone_cr() {
    assert_eq!(Request::parse(b"/a\n").as_bytes(), b"/a");
    assert_eq!(Request::parse(b"/a\r").as_bytes(), b"/a");
}

#[test]
fn test_parse_keeps_inner_whitespace() {
    let req = Request::parse(b"/my file.txt\r\n");
    assert_eq!(req.to_text(), "/my file.txt");
}

#[test]
fn test_empty_line_is_empty_request() {
    let req = Request::parse(b"\r\n");
    assert!(req.is_empty());
    assert_eq!(req.kind(), RequestKind::Selector(b""));
}

#[test]
fn test_long_request_is_truncated() {
    let long = format!("/{}", "a".repeat(100));
    let req = Request::parse(long.as_bytes());

    assert_eq!(req.as_bytes().len(), MAX_REQUEST_LEN);
    assert_eq!(req.as_bytes(), &long.as_bytes()[..MAX_REQUEST_LEN]);
}

#[test]
fn test_url_prefix_is_redirect() {
    let req = Request::from("URL:http://example.com\r\n");
    assert_eq!(req.kind(), RequestKind::Redirect(b"http://example.com"));
}

#[test]
fn test_url_prefix_is_case_sensitive() {
    let req = Request::from("url:http://example.com");
    assert!(matches!(req.kind(), RequestKind::Selector(_)));
}

#[test]
fn test_display_replaces_invalid_utf8() {
    let req = Request::parse(b"/caf\xE9\n");
    assert_eq!(req.to_string(), "/caf\u{FFFD}");
}
