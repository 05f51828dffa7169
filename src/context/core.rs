use crate::app::{App, Handler};
use crate::context::form::FormData;
use crate::error::Error;
use crate::server::{Request, Response};
use serde_json::Value;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use tracing::warn;

/// Scratch-store key under which the resolved client address is memoized.
pub(crate) const REMOTE_ADDR_KEY: &str = "_def:remoteAddr";

/// User-agent markers treated as mobile clients.
const MOBILE_UA_MARKERS: [&str; 3] = ["iPhone", "iPod", "Android"];

/// Parse a string value, silently yielding the zero value on failure.
/// Typed parameter/query/cookie accessors never fail the request.
pub(crate) fn parse_or_zero<T: FromStr + Default>(s: &str) -> T {
    s.parse().unwrap_or_default()
}

/// Boolean flavor of parse-or-zero, accepting the usual flag spellings
/// (`1`, `t`, `true` in any case). Everything else is `false`.
pub(crate) fn parse_flag(s: &str) -> bool {
    matches!(s, "1" | "t" | "T" | "true" | "TRUE" | "True")
}

/// Per-request execution context.
///
/// Binds the parsed request and the buffered response, and carries the
/// route-parameter store, the generic scratch store, the lazily parsed form
/// data, and the middleware chain cursor. One instance serves exactly one
/// in-flight request at a time; instances are pooled and [`reset`](Self::reset)
/// between requests rather than reallocated.
pub struct Context {
    /// Inbound request, rebound on every reset
    pub request: Request,
    /// Buffered response writer with a write-once discipline
    pub response: Response,
    app: Arc<App>,
    store: HashMap<String, Value>,
    param_names: Vec<String>,
    param_values: Vec<String>,
    handlers: Vec<Arc<dyn Handler>>,
    cursor: usize,
    pub(crate) form: FormData,
}

impl Context {
    /// Create a fresh context slot bound to the app. The handler chain is
    /// seeded with the app's global middleware prefix.
    #[must_use]
    pub fn new(app: Arc<App>) -> Self {
        let handlers = app.middleware().to_vec();
        Self {
            request: Request::empty(),
            response: Response::new(),
            app,
            store: HashMap::new(),
            param_names: Vec::new(),
            param_values: Vec::new(),
            handlers,
            cursor: 0,
            form: FormData::new(),
        }
    }

    /// Rebind the slot to a new request: clears cursor, parameters, scratch
    /// store, and form state, resets the response, and re-seeds the handler
    /// chain to the global middleware prefix. Capacity is retained.
    pub fn reset(&mut self, request: Request) {
        self.request = request;
        self.response.reset();
        self.cursor = 0;
        self.handlers.clear();
        self.handlers.extend(self.app.middleware().iter().cloned());
        self.param_names.clear();
        self.param_values.clear();
        self.store.clear();
        self.form.reset();
    }

    #[must_use]
    pub fn app(&self) -> &Arc<App> {
        &self.app
    }

    // --- scratch store ---

    /// Store a value for the remainder of this request.
    pub fn set(&mut self, key: &str, value: Value) {
        self.store.insert(key.to_string(), value);
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.store.get(key)
    }

    /// The full request-lifetime store, as handed to template rendering.
    #[must_use]
    pub fn store(&self) -> &HashMap<String, Value> {
        &self.store
    }

    // --- route parameters ---

    /// Append a route parameter. Called by the router for each matched path
    /// segment; duplicate names are kept, not deduplicated.
    pub fn set_param(&mut self, name: &str, value: &str) {
        self.param_names.push(name.to_string());
        self.param_values.push(value.to_string());
    }

    /// First value recorded under `name`, or `""` if absent. Parameter
    /// counts are small, so a forward scan beats map overhead and keeps
    /// declaration order.
    #[must_use]
    pub fn param(&self, name: &str) -> &str {
        for (i, n) in self.param_names.iter().enumerate() {
            if n == name {
                return &self.param_values[i];
            }
        }
        ""
    }

    #[must_use]
    pub fn param_int(&self, name: &str) -> i32 {
        parse_or_zero(self.param(name))
    }

    #[must_use]
    pub fn param_int64(&self, name: &str) -> i64 {
        parse_or_zero(self.param(name))
    }

    #[must_use]
    pub fn param_float(&self, name: &str) -> f64 {
        parse_or_zero(self.param(name))
    }

    #[must_use]
    pub fn param_bool(&self, name: &str) -> bool {
        parse_flag(self.param(name))
    }

    // --- handler chain ---

    /// Append a handler to this request's chain. Called by the router with
    /// the matched route handler(s), after the global middleware prefix.
    pub fn push_handler(&mut self, handler: Arc<dyn Handler>) {
        self.handlers.push(handler);
    }

    /// Execute the next handler in the chain.
    ///
    /// If something has already been written to the response the chain is
    /// considered terminated: a warning is logged and no handler runs. Past
    /// the end of the chain this is a no-op. Otherwise the handler at the
    /// cursor is invoked after the cursor advances, so a handler continuing
    /// the chain calls `next()` exactly once.
    pub fn next(&mut self) {
        if self.response.wrote() {
            warn!("content has been written, handler chain break");
            return;
        }
        if self.cursor >= self.handlers.len() {
            return;
        }
        let handler = self.handlers[self.cursor].clone();
        self.cursor += 1;
        handler.handle(self);
    }

    /// Forward an error to the application error handler. Encoders call this
    /// for serialization and rendering failures; middleware may use it
    /// directly.
    pub fn error(&mut self, err: &Error) {
        let app = self.app.clone();
        app.handle_error(err, self);
    }

    // --- derived request metadata ---

    /// Best-effort client address: `X-Real-IP`, then `X-Forwarded-For`, then
    /// the transport peer address (host part). Memoized in the scratch store
    /// for the remainder of the request; first computation wins.
    pub fn remote_addr(&mut self) -> String {
        if let Some(Value::String(addr)) = self.store.get(REMOTE_ADDR_KEY) {
            return addr.clone();
        }
        let mut addr = self.request.header("x-real-ip").unwrap_or("").to_string();
        if addr.is_empty() {
            addr = self
                .request
                .header("x-forwarded-for")
                .unwrap_or("")
                .to_string();
        }
        if addr.is_empty() {
            if let Some(peer) = &self.request.peer_addr {
                addr = peer
                    .rsplit_once(':')
                    .map(|(host, _)| host)
                    .unwrap_or(peer.as_str())
                    .to_string();
            }
        }
        self.store
            .insert(REMOTE_ADDR_KEY.to_string(), Value::String(addr.clone()));
        addr
    }

    #[must_use]
    pub fn referer(&self) -> &str {
        self.request.header("referer").unwrap_or("")
    }

    #[must_use]
    pub fn user_agent(&self) -> &str {
        self.request.header("user-agent").unwrap_or("")
    }

    /// Substring match against a small fixed list of mobile UA markers.
    #[must_use]
    pub fn is_mobile(&self) -> bool {
        let ua = self.user_agent();
        MOBILE_UA_MARKERS.iter().any(|m| ua.contains(m))
    }
}
