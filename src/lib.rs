//! # Gantry
//!
//! **Gantry** is a lightweight per-request context and middleware-chain core
//! for coroutine HTTP services, built on the `may` runtime and
//! `may_minihttp`.
//!
//! ## Overview
//!
//! For every inbound request the framework binds request/response objects,
//! exposes uniform accessors for route parameters, query/form data, cookies,
//! and file uploads, executes an ordered handler chain with explicit
//! continuation (`next()`) and short-circuit semantics, and multiplexes
//! structured output (text, JSON, JSONP, XML, HTML, redirects) onto a single
//! buffered response writer.
//!
//! ## Architecture
//!
//! - **[`context`]** — the per-request [`Context`] aggregate: parameter
//!   store, scratch store, lazy form parser, output encoders, cookie codec,
//!   and the chain cursor
//! - **[`app`]** — the [`App`] aggregate: global middleware, debug flag,
//!   template engine, and error hook
//! - **[`pool`]** — reusable context slots (checkout / reset / restore)
//! - **[`router`]** — the routing seam ([`Router`] trait) plus a minimal
//!   segment-matching [`RouteTable`]
//! - **[`render`]** — the [`TemplateEngine`] seam with a minijinja backend
//! - **[`server`]** — the `may_minihttp` transport edge
//! - **[`error`]** — the crate error type funneled through `Context::error`
//!
//! ## Request Flow
//!
//! 1. `AppService` parses the transport request and checks a [`Context`] out
//!    of the pool (reset, not reallocated).
//! 2. The router populates route parameters and appends the matched
//!    handler(s) after the global middleware prefix.
//! 3. `ctx.next()` drives the chain: each handler either writes a response
//!    (halting the chain) or calls `next()` to continue it.
//! 4. The buffered response is flushed to the transport exactly once and the
//!    context returns to the pool.
//!
//! ## Example
//!
//! ```rust,no_run
//! use gantry::{App, AppService, Context, HttpServer, RouteTable};
//! use http::Method;
//! use std::sync::Arc;
//!
//! let mut app = App::new();
//! app.add_middleware(Arc::new(|ctx: &mut Context| {
//!     ctx.set("trace", serde_json::json!(true));
//!     ctx.next();
//! }));
//!
//! let mut routes = RouteTable::new();
//! routes.add(
//!     Method::GET,
//!     "/pets/{id}",
//!     Arc::new(|ctx: &mut Context| {
//!         let id = ctx.param_int64("id");
//!         ctx.json(200, &serde_json::json!({ "id": id }));
//!     }),
//! );
//!
//! let service = AppService::new(Arc::new(app), Arc::new(routes));
//! let handle = HttpServer::new(service).start("127.0.0.1:8080").unwrap();
//! handle.join().unwrap();
//! ```

pub mod app;
pub mod context;
pub mod error;
pub mod pool;
pub mod render;
pub mod router;
pub mod server;

pub use app::{App, ErrorHook, Handler};
pub use context::{Context, CookieOptions, FormData, UploadedFile};
pub use error::Error;
pub use pool::ContextPool;
pub use render::{MiniJinjaEngine, TemplateEngine};
pub use router::{RouteTable, Router};
pub use server::{AppService, HttpServer, Request, Response, ServerHandle};
