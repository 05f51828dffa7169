use smallvec::SmallVec;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, OnceLock};
use tracing::warn;

/// Maximum inline headers before heap allocation.
/// Most responses carry well under 16 headers.
pub const MAX_INLINE_HEADERS: usize = 16;

/// Stack-allocated header storage for the response hot path.
///
/// Header names use `Arc<str>` because they are usually static and repeated
/// (Content-Type, Location, Set-Cookie); values are per-response data.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// Buffered response wrapper tracking status, headers, body, and whether
/// anything has been written yet.
///
/// One `Response` lives inside each pooled [`Context`](crate::Context) slot
/// and is reset between requests. Handlers and encoders write into it; the
/// service flushes it to the transport once the chain finishes.
#[derive(Debug)]
pub struct Response {
    status: u16,
    headers: HeaderVec,
    body: Vec<u8>,
    wrote: bool,
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Response {
    #[must_use]
    pub fn new() -> Self {
        Self {
            status: 200,
            headers: HeaderVec::new(),
            body: Vec::new(),
            wrote: false,
        }
    }

    /// Clear all per-request state, retaining allocations for reuse.
    pub fn reset(&mut self) {
        self.status = 200;
        self.headers.clear();
        self.body.clear();
        self.wrote = false;
    }

    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderVec {
        &self.headers
    }

    /// Get a header by name (case-insensitive per RFC 7230)
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add or replace a header (case-insensitive match on the name).
    pub fn set_header(&mut self, name: &str, value: String) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((Arc::from(name), value));
    }

    /// Append a header without replacing existing ones with the same name.
    /// Used for `Set-Cookie`, which may legitimately repeat.
    pub fn add_header(&mut self, name: &str, value: String) {
        self.headers.push((Arc::from(name), value));
    }

    /// All values for a repeatable header, in insertion order.
    #[must_use]
    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Record the status code and mark the response as written.
    ///
    /// The first status wins; a second call is logged and ignored, mirroring
    /// what a streaming transport would do with a superfluous status write.
    pub fn write_status(&mut self, code: u16) {
        if self.wrote {
            warn!(
                status = self.status,
                attempted = code,
                "status already written, ignoring superfluous write_status"
            );
            return;
        }
        self.status = code;
        self.wrote = true;
    }

    /// Append body bytes and mark the response as written.
    pub fn write(&mut self, bytes: &[u8]) {
        self.body.extend_from_slice(bytes);
        self.wrote = true;
    }

    /// Whether a status or any body bytes have been written.
    #[must_use]
    pub fn wrote(&self) -> bool {
        self.wrote
    }

    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

/// Reason phrase for the status line, covering the codes the framework
/// itself emits plus the redirect range.
#[must_use]
pub fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        300 => "Multiple Choices",
        301 => "Moved Permanently",
        302 => "Found",
        303 => "See Other",
        304 => "Not Modified",
        307 => "Temporary Redirect",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "OK",
    }
}

static HEADER_LINES: OnceLock<Mutex<HashSet<&'static str>>> = OnceLock::new();

/// Intern a `name: value` header line for the transport.
///
/// may_minihttp takes `&'static str` headers, which forces leaking. Header
/// lines repeat heavily (content types, redirect locations, fixed cookies),
/// so interning bounds the leak to one allocation per distinct line instead
/// of one per header per response.
fn intern_header_line(name: &str, value: &str) -> &'static str {
    let line = format!("{name}: {value}");
    let mut lines = HEADER_LINES
        .get_or_init(|| Mutex::new(HashSet::new()))
        .lock()
        .unwrap();
    if let Some(existing) = lines.get(line.as_str()) {
        return existing;
    }
    let leaked: &'static str = Box::leak(line.into_boxed_str());
    lines.insert(leaked);
    leaked
}

/// Copy a buffered response onto the transport-level writer.
pub fn flush_response(from: &Response, to: &mut may_minihttp::Response) {
    to.status_code(from.status() as usize, status_reason(from.status()));
    for (name, value) in from.headers() {
        to.header(intern_header_line(name, value));
    }
    to.body_vec(from.body().to_vec());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_reason() {
        assert_eq!(status_reason(200), "OK");
        assert_eq!(status_reason(302), "Found");
        assert_eq!(status_reason(404), "Not Found");
    }

    #[test]
    fn test_first_status_wins() {
        let mut res = Response::new();
        res.write_status(404);
        res.write_status(200);
        assert_eq!(res.status(), 404);
        assert!(res.wrote());
    }

    #[test]
    fn test_write_appends() {
        let mut res = Response::new();
        res.write(b"hello");
        res.write(b" world");
        assert_eq!(res.body(), b"hello world");
    }

    #[test]
    fn test_set_header_replaces_add_header_appends() {
        let mut res = Response::new();
        res.set_header("Content-Type", "text/plain".to_string());
        res.set_header("content-type", "application/json".to_string());
        assert_eq!(res.get_header("Content-Type"), Some("application/json"));

        res.add_header("Set-Cookie", "a=1".to_string());
        res.add_header("Set-Cookie", "b=2".to_string());
        assert_eq!(res.header_values("Set-Cookie"), vec!["a=1", "b=2"]);
    }

    #[test]
    fn test_header_lines_intern_to_one_allocation() {
        let a = intern_header_line("Content-Type", "text/plain; charset=utf-8");
        let b = intern_header_line("Content-Type", "text/plain; charset=utf-8");
        assert!(std::ptr::eq(a, b));
        assert_eq!(a, "Content-Type: text/plain; charset=utf-8");

        let c = intern_header_line("Content-Type", "text/html; charset=utf-8");
        assert!(!std::ptr::eq(a, c));
    }

    #[test]
    fn test_reset_clears_state() {
        let mut res = Response::new();
        res.set_header("X-Test", "1".to_string());
        res.write_status(500);
        res.write(b"boom");
        res.reset();
        assert_eq!(res.status(), 200);
        assert!(res.headers().is_empty());
        assert!(res.body().is_empty());
        assert!(!res.wrote());
    }
}
