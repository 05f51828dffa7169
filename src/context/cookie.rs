//! Cookie codec: percent-escaped values with optional attributes.

use crate::context::core::{parse_flag, parse_or_zero};
use crate::context::Context;

/// Optional `Set-Cookie` attributes with documented defaults.
///
/// `path` defaults to `"/"` when `None` or empty; everything else is off
/// unless set.
#[derive(Debug, Clone, Default)]
pub struct CookieOptions {
    /// Max-Age in seconds
    pub max_age: Option<i64>,
    /// Cookie path; `"/"` when unset or empty
    pub path: Option<String>,
    /// Cookie domain; omitted when unset or empty
    pub domain: Option<String>,
    pub secure: bool,
    pub http_only: bool,
}

impl Context {
    /// Append a cookie with default attributes (`Path=/`).
    pub fn set_cookie(&mut self, name: &str, value: &str) {
        self.set_cookie_with(name, value, CookieOptions::default());
    }

    /// Append a cookie to the response. The value is percent-escaped, and
    /// the header is added rather than replaced, so a response may carry
    /// several cookies.
    pub fn set_cookie_with(&mut self, name: &str, value: &str, opts: CookieOptions) {
        let mut cookie = format!("{}={}", name, urlencoding::encode(value));
        if let Some(max_age) = opts.max_age {
            cookie.push_str(&format!("; Max-Age={max_age}"));
        }
        let path = match opts.path {
            Some(p) if !p.is_empty() => p,
            _ => "/".to_string(),
        };
        cookie.push_str(&format!("; Path={path}"));
        if let Some(domain) = opts.domain {
            if !domain.is_empty() {
                cookie.push_str(&format!("; Domain={domain}"));
            }
        }
        if opts.secure {
            cookie.push_str("; Secure");
        }
        if opts.http_only {
            cookie.push_str("; HttpOnly");
        }
        self.response.add_header("Set-Cookie", cookie);
    }

    /// The named request cookie, percent-unescaped. Returns `""` when the
    /// cookie is absent or its value is malformed.
    #[must_use]
    pub fn cookie(&self, name: &str) -> String {
        match self.request.cookies.get(name) {
            Some(raw) => urlencoding::decode(raw)
                .map(|v| v.into_owned())
                .unwrap_or_default(),
            None => String::new(),
        }
    }

    #[must_use]
    pub fn cookie_int(&self, name: &str) -> i32 {
        parse_or_zero(&self.cookie(name))
    }

    #[must_use]
    pub fn cookie_int64(&self, name: &str) -> i64 {
        parse_or_zero(&self.cookie(name))
    }

    #[must_use]
    pub fn cookie_float(&self, name: &str) -> f64 {
        parse_or_zero(&self.cookie(name))
    }

    #[must_use]
    pub fn cookie_bool(&self, name: &str) -> bool {
        parse_flag(&self.cookie(name))
    }
}
