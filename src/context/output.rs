//! Output encoders: the single place a response body is produced.
//!
//! Every encoder sets a content-type, writes the status, and writes the
//! serialized body in one call. Serialization and rendering failures never
//! write a partial body; they are funneled through [`Context::error`] so
//! error-response policy stays in the application error hook.

use crate::context::Context;
use crate::error::Error;
use serde::Serialize;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const LOCATION: &str = "Location";

pub const APPLICATION_JSON_UTF8: &str = "application/json; charset=utf-8";
pub const APPLICATION_JAVASCRIPT_UTF8: &str = "application/javascript; charset=utf-8";
pub const APPLICATION_XML_UTF8: &str = "application/xml; charset=utf-8";
pub const TEXT_HTML_UTF8: &str = "text/html; charset=utf-8";
pub const TEXT_PLAIN_UTF8: &str = "text/plain; charset=utf-8";

/// Standard XML declaration prefixed to every XML response.
pub const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

impl Context {
    /// Write a plain-text response.
    pub fn string(&mut self, code: u16, s: &str) {
        self.response
            .set_header(CONTENT_TYPE, TEXT_PLAIN_UTF8.to_string());
        self.response.write_status(code);
        self.response.write(s.as_bytes());
    }

    /// Write raw bytes with an HTML content-type.
    ///
    /// The `string`/`text` content-type asymmetry is long-standing and
    /// call sites depend on it; do not unify the two.
    pub fn text(&mut self, code: u16, body: &[u8]) {
        self.response
            .set_header(CONTENT_TYPE, TEXT_HTML_UTF8.to_string());
        self.response.write_status(code);
        self.response.write(body);
    }

    /// Write a JSON response. Pretty-printed with two-space indentation in
    /// debug mode, compact otherwise. A serialization failure writes nothing
    /// and goes through the error hook.
    pub fn json<T: Serialize>(&mut self, code: u16, value: &T) {
        let serialized = if self.app().debug() {
            serde_json::to_vec_pretty(value)
        } else {
            serde_json::to_vec(value)
        };
        match serialized {
            Ok(body) => {
                self.response
                    .set_header(CONTENT_TYPE, APPLICATION_JSON_UTF8.to_string());
                self.response.write_status(code);
                self.response.write(&body);
            }
            Err(e) => self.error(&Error::Json(e)),
        }
    }

    /// Serialize to a JSON string without writing anything, honoring the
    /// debug-mode pretty flag like [`json`](Self::json).
    pub fn json_string<T: Serialize>(&self, value: &T) -> Result<String, Error> {
        let s = if self.app().debug() {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(s)
    }

    /// Write a JSONP response: compact JSON (never pretty) wrapped as
    /// `callback(...);` with a JavaScript content-type.
    pub fn jsonp<T: Serialize>(&mut self, code: u16, callback: &str, value: &T) {
        match serde_json::to_vec(value) {
            Ok(body) => {
                self.response
                    .set_header(CONTENT_TYPE, APPLICATION_JAVASCRIPT_UTF8.to_string());
                self.response.write_status(code);
                self.response.write(callback.as_bytes());
                self.response.write(b"(");
                self.response.write(&body);
                self.response.write(b");");
            }
            Err(e) => self.error(&Error::Json(e)),
        }
    }

    /// Write an XML response, prefixed with the standard XML declaration.
    /// Pretty-printed in debug mode, compact otherwise.
    pub fn xml<T: Serialize>(&mut self, code: u16, value: &T) {
        let mut out = String::new();
        let mut serializer = quick_xml::se::Serializer::new(&mut out);
        if self.app().debug() {
            serializer.indent(' ', 2);
        }
        match value.serialize(serializer) {
            Ok(_) => {
                self.response
                    .set_header(CONTENT_TYPE, APPLICATION_XML_UTF8.to_string());
                self.response.write_status(code);
                self.response.write(XML_DECLARATION.as_bytes());
                self.response.write(out.as_bytes());
            }
            Err(e) => self.error(&Error::Xml(e)),
        }
    }

    /// Alias of [`render`](Self::render).
    pub fn html(&mut self, code: u16, template: &str) {
        self.render(code, template);
    }

    /// Render a template with the scratch store as context and write it with
    /// an HTML content-type. A rendering failure writes nothing and goes
    /// through the error hook.
    pub fn render(&mut self, code: u16, template: &str) {
        match self.fetch(template) {
            Ok(body) => {
                self.response
                    .set_header(CONTENT_TYPE, TEXT_HTML_UTF8.to_string());
                self.response.write_status(code);
                self.response.write(&body);
            }
            Err(e) => self.error(&e),
        }
    }

    /// Render a template with the scratch store as context and return the
    /// bytes without writing, for composition into larger responses.
    pub fn fetch(&self, template: &str) -> Result<Vec<u8>, Error> {
        let engine = self.app().template_engine().ok_or(Error::NoTemplateEngine)?;
        let mut buf = Vec::new();
        engine.render(&mut buf, template, self.store())?;
        Ok(buf)
    }

    /// Redirect with a status in the 300..=307 range: sets the Location
    /// header and the status. A code outside the range is rejected without
    /// any response side effect.
    pub fn redirect(&mut self, code: u16, url: &str) -> Result<(), Error> {
        if !(300..=307).contains(&code) {
            return Err(Error::InvalidRedirectStatus(code));
        }
        self.response.set_header(LOCATION, url.to_string());
        self.response.write_status(code);
        Ok(())
    }
}
