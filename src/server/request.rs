use http::Method;
use std::collections::HashMap;
use std::io::Read;
use tracing::debug;

/// Parsed HTTP request data bound into a [`Context`](crate::Context).
///
/// Contains everything extracted from the raw transport request: method,
/// path, query string, headers, cookies, and the buffered body. Fields are
/// public so tests and adapters for other transports can build one directly.
#[derive(Debug)]
pub struct Request {
    /// HTTP method (GET, POST, etc.)
    pub method: Method,
    /// Request path without the query string
    pub path: String,
    /// Raw query string (everything after `?`, possibly empty)
    pub query_string: String,
    /// HTTP headers (lowercase keys)
    pub headers: HashMap<String, String>,
    /// Cookies parsed from the Cookie header
    pub cookies: HashMap<String, String>,
    /// Raw request body bytes
    pub body: Vec<u8>,
    /// Peer address as reported by the transport, when available
    pub peer_addr: Option<String>,
}

impl Request {
    /// Build a request from a method and a target like `/users?limit=10`.
    #[must_use]
    pub fn new(method: Method, target: &str) -> Self {
        let (path, query) = match target.split_once('?') {
            Some((p, q)) => (p, q),
            None => (target, ""),
        };
        Self {
            method,
            path: path.to_string(),
            query_string: query.to_string(),
            headers: HashMap::new(),
            cookies: HashMap::new(),
            body: Vec::new(),
            peer_addr: None,
        }
    }

    /// Placeholder request bound into an idle context slot.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Method::GET, "/")
    }

    /// Get a header by name (case-insensitive; stored keys are lowercase).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Set a header, normalizing the name to lowercase.
    pub fn set_header(&mut self, name: &str, value: &str) {
        self.headers
            .insert(name.to_ascii_lowercase(), value.to_string());
    }
}

/// Parse cookie pairs out of a (lowercased) header map.
#[must_use]
pub fn parse_cookies(headers: &HashMap<String, String>) -> HashMap<String, String> {
    headers
        .get("cookie")
        .map(|c| {
            c.split(';')
                .filter_map(|pair| {
                    let mut parts = pair.trim().splitn(2, '=');
                    let name = parts.next()?.trim().to_string();
                    let value = parts.next().unwrap_or("").trim().to_string();
                    Some((name, value))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Parse an incoming `may_minihttp` request into a [`Request`].
///
/// Headers are lowercased, cookies split out of the Cookie header, and the
/// body buffered in full. The query string is kept raw; form parsing is lazy
/// and happens on first access through the context.
pub fn parse_request(req: may_minihttp::Request) -> Request {
    let method = req
        .method()
        .parse::<Method>()
        .unwrap_or(Method::GET);
    let raw_path = req.path().to_string();
    let (path, query) = match raw_path.split_once('?') {
        Some((p, q)) => (p.to_string(), q.to_string()),
        None => (raw_path, String::new()),
    };

    let headers: HashMap<String, String> = req
        .headers()
        .iter()
        .map(|h| {
            (
                h.name.to_ascii_lowercase(),
                String::from_utf8_lossy(h.value).to_string(),
            )
        })
        .collect();

    let cookies = parse_cookies(&headers);

    let mut body = Vec::new();
    if req.body().read_to_end(&mut body).is_err() {
        body.clear();
    }

    debug!(
        method = %method,
        path = %path,
        header_count = headers.len(),
        cookie_count = cookies.len(),
        body_bytes = body.len(),
        "request parsed"
    );

    Request {
        method,
        path,
        query_string: query,
        headers,
        cookies,
        body,
        peer_addr: None,
    }
}
