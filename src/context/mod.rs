//! # Context Module
//!
//! The per-request execution context: request/response bindings, route
//! parameters, the scratch store, lazily parsed form data, the output
//! encoders, the cookie codec, and the middleware chain cursor.
//!
//! One [`Context`] serves exactly one in-flight request. Instances come from
//! a [`ContextPool`](crate::pool::ContextPool) and are reset between
//! requests, so nothing here needs internal locking: the owning coroutine is
//! the only mutator for the duration of a request.
//!
//! The surface splits across focused files:
//!
//! - `core` — the aggregate itself, lifecycle, parameters, chain, metadata
//! - `form` — lazy query/body/multipart parsing and upload accessors
//! - `output` — the encoders (text, JSON, JSONP, XML, HTML, redirect)
//! - `cookie` — the cookie codec and typed cookie readers

mod cookie;
mod core;
mod form;
mod output;

pub use cookie::CookieOptions;
pub use core::Context;
pub use form::{FormData, UploadedFile};
pub use output::{
    APPLICATION_JAVASCRIPT_UTF8, APPLICATION_JSON_UTF8, APPLICATION_XML_UTF8, CONTENT_TYPE,
    LOCATION, TEXT_HTML_UTF8, TEXT_PLAIN_UTF8, XML_DECLARATION,
};
