use gantry::{CookieOptions, Request};
use http::Method;

mod common;
use common::make_context;

/// Move the first Set-Cookie pair of a response onto a fresh request, the
/// way a client jar would echo it back.
fn echo_cookie(set_cookie: &str) -> Request {
    let pair = set_cookie.split(';').next().unwrap().trim();
    let (name, value) = pair.split_once('=').unwrap();
    let mut req = Request::new(Method::GET, "/");
    req.cookies.insert(name.to_string(), value.to_string());
    req
}

#[test]
fn test_cookie_round_trip() {
    let mut ctx = make_context(Request::new(Method::GET, "/"));
    ctx.set_cookie("a", "b");
    let header = ctx.response.get_header("Set-Cookie").unwrap().to_string();

    let ctx = make_context(echo_cookie(&header));
    assert_eq!(ctx.cookie("a"), "b");
}

#[test]
fn test_cookie_round_trip_with_reserved_characters() {
    let original = "b c/δ=&;";
    let mut ctx = make_context(Request::new(Method::GET, "/"));
    ctx.set_cookie("session", original);
    let header = ctx.response.get_header("Set-Cookie").unwrap().to_string();
    // the encoded value must not leak cookie syntax
    let encoded = header.split(';').next().unwrap();
    assert!(!encoded.contains(' '));
    assert!(!encoded.contains("=&"));

    let ctx = make_context(echo_cookie(&header));
    assert_eq!(ctx.cookie("session"), original);
}

#[test]
fn test_set_cookie_defaults_to_root_path() {
    let mut ctx = make_context(Request::new(Method::GET, "/"));
    ctx.set_cookie("a", "b");
    assert_eq!(ctx.response.get_header("Set-Cookie"), Some("a=b; Path=/"));
}

#[test]
fn test_set_cookie_with_full_options() {
    let mut ctx = make_context(Request::new(Method::GET, "/"));
    ctx.set_cookie_with(
        "a",
        "b",
        CookieOptions {
            max_age: Some(3600),
            path: Some("/admin".to_string()),
            domain: Some("example.com".to_string()),
            secure: true,
            http_only: true,
        },
    );
    assert_eq!(
        ctx.response.get_header("Set-Cookie"),
        Some("a=b; Max-Age=3600; Path=/admin; Domain=example.com; Secure; HttpOnly")
    );
}

#[test]
fn test_empty_path_and_domain_take_defaults() {
    let mut ctx = make_context(Request::new(Method::GET, "/"));
    ctx.set_cookie_with(
        "a",
        "b",
        CookieOptions {
            path: Some(String::new()),
            domain: Some(String::new()),
            ..CookieOptions::default()
        },
    );
    assert_eq!(ctx.response.get_header("Set-Cookie"), Some("a=b; Path=/"));
}

#[test]
fn test_multiple_cookies_append_rather_than_replace() {
    let mut ctx = make_context(Request::new(Method::GET, "/"));
    ctx.set_cookie("a", "1");
    ctx.set_cookie("b", "2");
    let values = ctx.response.header_values("Set-Cookie");
    assert_eq!(values.len(), 2);
    assert!(values[0].starts_with("a=1"));
    assert!(values[1].starts_with("b=2"));
}

#[test]
fn test_absent_cookie_reads_as_empty_string() {
    let ctx = make_context(Request::new(Method::GET, "/"));
    assert_eq!(ctx.cookie("missing"), "");
}

#[test]
fn test_typed_cookie_readers_default_to_zero() {
    let mut req = Request::new(Method::GET, "/");
    req.cookies.insert("n".to_string(), "abc".to_string());
    req.cookies.insert("count".to_string(), "12".to_string());
    req.cookies.insert("flag".to_string(), "1".to_string());
    let ctx = make_context(req);

    assert_eq!(ctx.cookie_int("n"), 0);
    assert_eq!(ctx.cookie_int64("n"), 0);
    assert_eq!(ctx.cookie_float("n"), 0.0);
    assert!(!ctx.cookie_bool("n"));

    assert_eq!(ctx.cookie_int("count"), 12);
    assert_eq!(ctx.cookie_int64("count"), 12);
    assert!(ctx.cookie_bool("flag"));
}
