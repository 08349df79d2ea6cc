//! Tests for turning requests into responses

use std::fs;
use std::path::Path;
use std::sync::Arc;

use gopherd::config::ServerConfig;
use gopherd::gopher::render::{GOPHERMAP, Renderer};
use gopherd::gopher::request::Request;
use gopherd::gopher::response::ResponseKind;
use gopherd::gopher::sniff::ContentClass;
use tempfile::{TempDir, tempdir};

fn site() -> TempDir {
    let dir = tempdir().unwrap();
    let root = dir.path();

    fs::write(root.join(GOPHERMAP), "iWelcome to \\host\tfake\t\\host\t\\port\n").unwrap();
    fs::write(root.join("index.txt"), "Welcome to \\host:\\port\n").unwrap();
    fs::create_dir(root.join("sub")).unwrap();
    fs::write(root.join("sub").join(GOPHERMAP), "1Menu\t/sub/item\thost\tport\n").unwrap();
    fs::create_dir(root.join("empty")).unwrap();
    fs::write(root.join("logo.png"), b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR\n").unwrap();

    dir
}

fn renderer(root: &Path, strict: bool) -> Renderer {
    let cfg = ServerConfig::builder(root)
        .host("gopher.example")
        .port(70)
        .strict(strict)
        .build()
        .unwrap();
    Renderer::new(Arc::new(cfg))
}

#[tokio::test]
async fn test_file_is_interpolated() {
    let dir = site();
    let response = renderer(dir.path(), false)
        .render(&Request::from("/index.txt"))
        .await;

    assert_eq!(response.kind(), ResponseKind::File);
    assert_eq!(response.body(), b"Welcome to gopher.example:70\r\n");
}

#[tokio::test]
async fn test_strict_mode_keeps_tokens() {
    let dir = site();
    let response = renderer(dir.path(), true)
        .render(&Request::from("/index.txt"))
        .await;

    assert_eq!(response.body(), b"Welcome to \\host:\\port\r\n");
}

#[tokio::test]
async fn test_directory_serves_gophermap() {
    let dir = site();
    let response = renderer(dir.path(), false).render(&Request::from("/sub")).await;

    assert_eq!(response.kind(), ResponseKind::Menu);
    assert_eq!(response.body(), b"1Menu\t/sub/item\thost\tport\r\n");
}

#[tokio::test]
async fn test_empty_selector_serves_root_menu() {
    let dir = site();
    let response = renderer(dir.path(), false).render(&Request::from("")).await;

    assert_eq!(response.kind(), ResponseKind::Menu);
    assert_eq!(
        response.body(),
        b"iWelcome to gopher.example\tfake\tgopher.example\t70\r\n"
    );
}

#[tokio::test]
async fn test_missing_selector_is_not_found() {
    let dir = site();
    let response = renderer(dir.path(), false)
        .render(&Request::from("/missing"))
        .await;

    assert_eq!(response.kind(), ResponseKind::NotFound);
    assert_eq!(
        response.body(),
        b"3'/missing' does not exist (no handler found)\t\terror.host\t1\r\n"
    );
}

#[tokio::test]
async fn test_directory_without_gophermap_is_not_found() {
    let dir = site();
    let response = renderer(dir.path(), false).render(&Request::from("/empty")).await;

    assert_eq!(
        response.body(),
        b"3'/empty' does not exist (no handler found)\t\terror.host\t1\r\n"
    );
}

#[tokio::test]
async fn test_not_found_echo_is_interpolated() {
    let dir = site();
    let response = renderer(dir.path(), false)
        .render(&Request::from("/\\host"))
        .await;

    assert_eq!(
        response.body(),
        b"3'/gopher.example' does not exist (no handler found)\t\terror.host\t1\r\n"
    );
}

#[tokio::test]
async fn test_not_found_echo_keeps_tokens_in_strict_mode() {
    let dir = site();
    let response = renderer(dir.path(), true)
        .render(&Request::from("/\\port"))
        .await;

    assert_eq!(
        response.body(),
        b"3'/\\port' does not exist (no handler found)\t\terror.host\t1\r\n"
    );
}

#[tokio::test]
async fn test_not_found_with_inner_newline_uses_crlf() {
    let dir = site();
    let response = renderer(dir.path(), false)
        .render(&Request::parse(b"/a\nb\r\n"))
        .await;

    assert_eq!(
        response.body(),
        b"3'/a\r\nb' does not exist (no handler found)\t\terror.host\t1\r\n"
    );
}

#[tokio::test]
async fn test_not_found_echoes_raw_request_bytes() {
    let dir = site();
    let response = renderer(dir.path(), false)
        .render(&Request::parse(b"/caf\xE9\r\n"))
        .await;

    assert_eq!(
        response.body(),
        b"3'/caf\xE9' does not exist (no handler found)\t\terror.host\t1\r\n"
    );
}

#[tokio::test]
async fn test_traversal_serves_root_menu() {
    let dir = site();
    let renderer = renderer(dir.path(), false);
    let root_menu = renderer.render(&Request::from("/")).await;

    for selector in ["../../../etc/passwd", "/..", "sub/../../index.txt"] {
        let response = renderer.render(&Request::from(selector)).await;
        assert_eq!(response, root_menu, "{selector}");
    }
}

#[tokio::test]
async fn test_binary_file_passes_through() {
    let dir = site();
    let response = renderer(dir.path(), false)
        .render(&Request::from("/logo.png"))
        .await;

    assert_eq!(response.body(), b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR\n");
}

#[tokio::test]
async fn test_redirect_is_html_and_not_interpolated() {
    let dir = site();
    let response = renderer(dir.path(), false)
        .render(&Request::from("URL:http://example.com/\\host"))
        .await;
    let body = String::from_utf8(response.body().to_vec()).unwrap();

    assert_eq!(response.kind(), ResponseKind::Redirect);
    assert!(body.starts_with("<!DOCTYPE html>"));
    assert!(body.contains(r#"content="1; url=http://example.com/\host""#));
    assert!(body.contains(r#"<a href="http://example.com/\host">http://example.com/\host</a>"#));
    assert!(!body.contains("\r\n"));
}

#[tokio::test]
async fn test_redirect_target_is_verbatim() {
    let dir = site();
    let response = renderer(dir.path(), false)
        .render(&Request::from("URL:http://example.com"))
        .await;
    let body = String::from_utf8(response.body().to_vec()).unwrap();

    assert!(body.matches("http://example.com").count() >= 2);
}

#[tokio::test]
async fn test_custom_classifier_controls_interpolation() {
    let dir = site();
    let cfg = ServerConfig::builder(dir.path())
        .host("gopher.example")
        .build()
        .unwrap();
    let renderer = Renderer::with_classifier(Arc::new(cfg), |_: &[u8]| ContentClass::Binary);

    let response = renderer.render(&Request::from("/index.txt")).await;

    assert_eq!(response.body(), b"Welcome to \\host:\\port\n");
}
