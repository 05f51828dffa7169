//! # Server Module
//!
//! The transport edge: parsing `may_minihttp` requests into the framework's
//! [`Request`], the buffered [`Response`] wrapper with its write-once
//! discipline, the [`AppService`] that drives the per-request context and
//! middleware chain, and the [`HttpServer`] wrapper for running it.

pub mod http_server;
pub mod request;
pub mod response;
pub mod service;

pub use http_server::{HttpServer, ServerHandle};
pub use request::{parse_cookies, parse_request, Request};
pub use response::{flush_response, status_reason, HeaderVec, Response, MAX_INLINE_HEADERS};
pub use service::AppService;
