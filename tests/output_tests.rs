use gantry::{App, Context, Error, MiniJinjaEngine, Request};
use http::Method;
use serde::Serialize;
use serde_json::json;
use std::sync::{Arc, Mutex};

mod common;
use common::{make_context, make_context_with};

fn debug_app() -> App {
    let mut app = App::new();
    app.set_debug(true);
    app
}

#[derive(Serialize)]
struct Pet {
    name: String,
    age: u32,
}

#[test]
fn test_string_writes_plain_text() {
    let mut ctx = make_context(Request::new(Method::GET, "/"));
    ctx.string(200, "hello");
    assert_eq!(ctx.response.status(), 200);
    assert_eq!(
        ctx.response.get_header("Content-Type"),
        Some("text/plain; charset=utf-8")
    );
    assert_eq!(ctx.response.body(), b"hello");
}

#[test]
fn test_text_writes_html_content_type() {
    // `text` deliberately carries the HTML content-type; see the docs
    let mut ctx = make_context(Request::new(Method::GET, "/"));
    ctx.text(200, b"<b>hi</b>");
    assert_eq!(
        ctx.response.get_header("Content-Type"),
        Some("text/html; charset=utf-8")
    );
    assert_eq!(ctx.response.body(), b"<b>hi</b>");
}

#[test]
fn test_json_compact_by_default() {
    let mut ctx = make_context(Request::new(Method::GET, "/"));
    ctx.json(201, &json!({ "a": 1, "b": [1, 2] }));
    assert_eq!(ctx.response.status(), 201);
    assert_eq!(
        ctx.response.get_header("Content-Type"),
        Some("application/json; charset=utf-8")
    );
    let body = std::str::from_utf8(ctx.response.body()).unwrap();
    assert!(!body.contains('\n'));
}

#[test]
fn test_json_pretty_in_debug_mode_and_value_equal() {
    let value = json!({ "a": 1, "b": [1, 2] });

    let mut compact = make_context(Request::new(Method::GET, "/"));
    compact.json(200, &value);
    let mut pretty = make_context_with(debug_app(), Request::new(Method::GET, "/"));
    pretty.json(200, &value);

    assert_ne!(compact.response.body(), pretty.response.body());
    assert!(std::str::from_utf8(pretty.response.body())
        .unwrap()
        .contains("\n  \"a\": 1"));

    let reparsed_compact: serde_json::Value =
        serde_json::from_slice(compact.response.body()).unwrap();
    let reparsed_pretty: serde_json::Value =
        serde_json::from_slice(pretty.response.body()).unwrap();
    assert_eq!(reparsed_compact, reparsed_pretty);
}

#[test]
fn test_json_string_honors_debug_flag() {
    let ctx = make_context(Request::new(Method::GET, "/"));
    assert_eq!(
        ctx.json_string(&json!({ "a": 1 })).unwrap(),
        r#"{"a":1}"#
    );
    let ctx = make_context_with(debug_app(), Request::new(Method::GET, "/"));
    assert!(ctx.json_string(&json!({ "a": 1 })).unwrap().contains('\n'));
}

#[test]
fn test_jsonp_wraps_compact_json_even_in_debug_mode() {
    let mut ctx = make_context_with(debug_app(), Request::new(Method::GET, "/"));
    ctx.jsonp(200, "cb", &json!({ "a": 1 }));
    assert_eq!(
        ctx.response.get_header("Content-Type"),
        Some("application/javascript; charset=utf-8")
    );
    assert_eq!(ctx.response.body(), br#"cb({"a":1});"#);
}

#[test]
fn test_xml_prefixes_declaration() {
    let mut ctx = make_context(Request::new(Method::GET, "/"));
    ctx.xml(
        200,
        &Pet {
            name: "rex".to_string(),
            age: 3,
        },
    );
    assert_eq!(
        ctx.response.get_header("Content-Type"),
        Some("application/xml; charset=utf-8")
    );
    let body = std::str::from_utf8(ctx.response.body()).unwrap();
    assert!(body.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
    assert!(body.contains("<name>rex</name>"));
}

#[test]
fn test_redirect_rejects_codes_outside_range_without_writing() {
    let mut ctx = make_context(Request::new(Method::GET, "/"));
    let err = ctx.redirect(200, "/elsewhere").unwrap_err();
    assert!(matches!(err, Error::InvalidRedirectStatus(200)));
    assert!(!ctx.response.wrote());
    assert!(ctx.response.get_header("Location").is_none());

    let err = ctx.redirect(308, "/elsewhere").unwrap_err();
    assert!(matches!(err, Error::InvalidRedirectStatus(308)));
    assert!(!ctx.response.wrote());
}

#[test]
fn test_redirect_sets_location_and_status() {
    let mut ctx = make_context(Request::new(Method::GET, "/"));
    ctx.redirect(302, "https://example.com/next").unwrap();
    assert_eq!(ctx.response.status(), 302);
    assert_eq!(
        ctx.response.get_header("Location"),
        Some("https://example.com/next")
    );
    assert!(ctx.response.wrote());
}

#[test]
fn test_render_uses_scratch_store_as_template_context() {
    let mut engine = MiniJinjaEngine::new();
    engine
        .add_template("page", "<h1>{{ title }}</h1>")
        .unwrap();
    let mut app = App::new();
    app.set_template_engine(Arc::new(engine));

    let mut ctx = make_context_with(app, Request::new(Method::GET, "/"));
    ctx.set("title", json!("Welcome"));
    ctx.render(200, "page");

    assert_eq!(
        ctx.response.get_header("Content-Type"),
        Some("text/html; charset=utf-8")
    );
    assert_eq!(ctx.response.body(), b"<h1>Welcome</h1>");
}

#[test]
fn test_fetch_returns_bytes_without_writing() {
    let mut engine = MiniJinjaEngine::new();
    engine.add_template("frag", "x={{ x }}").unwrap();
    let mut app = App::new();
    app.set_template_engine(Arc::new(engine));

    let mut ctx = make_context_with(app, Request::new(Method::GET, "/"));
    ctx.set("x", json!(7));
    let bytes = ctx.fetch("frag").unwrap();
    assert_eq!(bytes, b"x=7");
    assert!(!ctx.response.wrote());
}

#[test]
fn test_render_failure_goes_through_error_hook_without_partial_body() {
    let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let hook_seen = seen.clone();

    let mut app = App::new();
    app.set_template_engine(Arc::new(MiniJinjaEngine::new()));
    app.set_error_hook(Box::new(move |err: &Error, ctx: &mut Context| {
        hook_seen.lock().unwrap().push(err.to_string());
        ctx.string(500, "custom error page");
    }));

    let mut ctx = make_context_with(app, Request::new(Method::GET, "/"));
    ctx.render(200, "missing-template");

    assert_eq!(seen.lock().unwrap().len(), 1);
    assert_eq!(ctx.response.status(), 500);
    assert_eq!(ctx.response.body(), b"custom error page");
}

#[test]
fn test_default_error_policy_writes_500() {
    let mut ctx = make_context(Request::new(Method::GET, "/"));
    // no template engine configured: render funnels through the default hook
    ctx.render(200, "whatever");
    assert_eq!(ctx.response.status(), 500);
    assert_eq!(ctx.response.body(), b"Internal Server Error");
}
