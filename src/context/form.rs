//! Lazy form parsing and the query/post/upload accessor surface.
//!
//! Nothing here touches the request body until a handler asks for a form
//! value. The first access parses once — multipart for body-bearing methods
//! with a multipart content type, URL-encoded query/body otherwise — and the
//! result is memoized for the rest of the request.

use crate::context::core::{parse_flag, parse_or_zero};
use crate::context::Context;
use crate::error::Error;
use crate::server::Request;
use bytes::Bytes;
use http::Method;
use serde_json::Value;
use std::collections::HashMap;
use std::convert::Infallible;
use std::path::Path;
use tracing::debug;

/// Memory ceiling when parsing a multipart form (32 MiB).
const DEFAULT_MAX_MEMORY: u64 = 32 << 20;

/// A file received through a multipart form field.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    /// Client-supplied file name
    pub filename: String,
    /// Content type of the part, if the client sent one
    pub content_type: Option<String>,
    /// Buffered file bytes
    pub data: Vec<u8>,
}

/// Parsed form state, memoized per request.
///
/// `query` holds URL query-string pairs, `post` holds body pairs (URL-encoded
/// or multipart text fields), both in wire order. Body values take precedence
/// over query values for the same key, matching common form semantics.
#[derive(Debug, Default)]
pub struct FormData {
    populated: bool,
    query: Vec<(String, String)>,
    post: Vec<(String, String)>,
    files: Vec<(String, UploadedFile)>,
}

impl FormData {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear parsed state, retaining capacity for reuse.
    pub fn reset(&mut self) {
        self.populated = false;
        self.query.clear();
        self.post.clear();
        self.files.clear();
    }

    /// One-time parse. The sentinel `populated` flag makes repeat calls
    /// no-ops; parse failures of any flavor leave the form empty rather than
    /// failing the request.
    fn parse(&mut self, req: &Request) {
        if self.populated {
            return;
        }
        self.populated = true;

        for (k, v) in url::form_urlencoded::parse(req.query_string.as_bytes()) {
            self.query.push((k.into_owned(), v.into_owned()));
        }

        let body_bearing = req.method == Method::POST || req.method == Method::PUT;
        if !body_bearing {
            return;
        }
        let content_type = req.header("content-type").unwrap_or("").to_string();
        if content_type.contains("multipart/form-data") {
            self.parse_multipart(&content_type, &req.body);
        } else if content_type.contains("application/x-www-form-urlencoded") {
            for (k, v) in url::form_urlencoded::parse(&req.body) {
                self.post.push((k.into_owned(), v.into_owned()));
            }
        }
    }

    /// Parse a buffered multipart body, capping the whole stream at
    /// [`DEFAULT_MAX_MEMORY`]. Parts with a filename become uploads; the
    /// rest become post fields.
    fn parse_multipart(&mut self, content_type: &str, body: &[u8]) {
        let boundary = match multer::parse_boundary(content_type) {
            Ok(b) => b,
            Err(e) => {
                debug!(error = %e, "multipart boundary missing, form left empty");
                return;
            }
        };
        let constraints = multer::Constraints::new()
            .size_limit(multer::SizeLimit::new().whole_stream(DEFAULT_MAX_MEMORY));
        let chunk = Bytes::copy_from_slice(body);
        let stream = futures::stream::once(futures::future::ready(Ok::<Bytes, Infallible>(chunk)));
        let mut multipart = multer::Multipart::with_constraints(stream, boundary, constraints);

        // The body is already buffered, so polling never actually blocks.
        let parsed: Result<(), multer::Error> = futures::executor::block_on(async {
            while let Some(field) = multipart.next_field().await? {
                let name = field.name().unwrap_or("").to_string();
                let filename = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(|m| m.to_string());
                let data = field.bytes().await?;
                match filename {
                    Some(filename) => self.files.push((
                        name,
                        UploadedFile {
                            filename,
                            content_type,
                            data: data.to_vec(),
                        },
                    )),
                    None => {
                        let text = String::from_utf8_lossy(&data).into_owned();
                        self.post.push((name, text));
                    }
                }
            }
            Ok(())
        });
        if let Err(e) = parsed {
            debug!(error = %e, "multipart form parse failed");
        }
    }

    /// First value for `name`, body fields before query fields, `""` if absent.
    fn value(&self, name: &str) -> &str {
        self.post
            .iter()
            .chain(self.query.iter())
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .unwrap_or("")
    }

    /// All values for `name` in wire order (body fields first).
    fn values(&self, name: &str) -> Vec<String> {
        self.post
            .iter()
            .chain(self.query.iter())
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
            .collect()
    }
}

/// Group repeated keys: a key with one value maps to a string, a key with
/// several maps to an array. Callers must handle both shapes.
fn group_values<'a, I>(pairs: I) -> HashMap<String, Value>
where
    I: Iterator<Item = &'a (String, String)>,
{
    let mut grouped: HashMap<String, Vec<String>> = HashMap::new();
    for (k, v) in pairs {
        grouped.entry(k.clone()).or_default().push(v.clone());
    }
    grouped
        .into_iter()
        .map(|(k, mut vs)| {
            let value = if vs.len() > 1 {
                Value::Array(vs.into_iter().map(Value::String).collect())
            } else {
                Value::String(vs.pop().unwrap_or_default())
            };
            (k, value)
        })
        .collect()
}

/// HTML-escape a value for safe interpolation into generated markup.
fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&#39;"),
            '"' => out.push_str("&#34;"),
            _ => out.push(c),
        }
    }
    out
}

impl Context {
    pub(crate) fn parse_form(&mut self) {
        let Context { form, request, .. } = self;
        form.parse(request);
    }

    /// First form value for `name` (body fields take precedence over query
    /// fields), or `""` if absent. Triggers the one-time form parse.
    pub fn query(&mut self, name: &str) -> &str {
        self.parse_form();
        self.form.value(name)
    }

    /// [`query`](Self::query) with surrounding whitespace trimmed.
    pub fn query_trim(&mut self, name: &str) -> &str {
        self.parse_form();
        self.form.value(name).trim()
    }

    /// All form values for a repeated key, in wire order. Never absent —
    /// a missing key yields an empty vector.
    pub fn query_strings(&mut self, name: &str) -> Vec<String> {
        self.parse_form();
        self.form.values(name)
    }

    /// HTML-escaped form value for safe interpolation into markup.
    pub fn query_escape(&mut self, name: &str) -> String {
        self.parse_form();
        html_escape(self.form.value(name))
    }

    pub fn query_int(&mut self, name: &str) -> i32 {
        parse_or_zero(self.query(name))
    }

    pub fn query_int64(&mut self, name: &str) -> i64 {
        parse_or_zero(self.query(name))
    }

    pub fn query_float(&mut self, name: &str) -> f64 {
        parse_or_zero(self.query(name))
    }

    pub fn query_bool(&mut self, name: &str) -> bool {
        parse_flag(self.query(name))
    }

    /// Materialize the URL query-string map: one value as a scalar string,
    /// repeated values as an array. Parses the raw query string directly and
    /// does not consult the body.
    #[must_use]
    pub fn querys(&self) -> HashMap<String, Value> {
        let pairs: Vec<(String, String)> =
            url::form_urlencoded::parse(self.request.query_string.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect();
        group_values(pairs.iter())
    }

    /// Materialize the post-body map with the same scalar/array shape as
    /// [`querys`](Self::querys). Falls back to the full form (body plus
    /// query) when the body carried no fields.
    pub fn posts(&mut self) -> HashMap<String, Value> {
        self.parse_form();
        if self.form.post.is_empty() {
            group_values(self.form.post.iter().chain(self.form.query.iter()))
        } else {
            group_values(self.form.post.iter())
        }
    }

    /// Uploaded file for the given multipart field name.
    pub fn file(&mut self, name: &str) -> Result<&UploadedFile, Error> {
        self.parse_form();
        self.form
            .files
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, f)| f)
            .ok_or_else(|| Error::MissingUpload(name.to_string()))
    }

    /// Write the named upload to `path`, creating or truncating the file.
    /// Blocks on disk I/O; callers needing cancellation wrap this themselves.
    pub fn save_file<P: AsRef<Path>>(&mut self, name: &str, path: P) -> Result<(), Error> {
        let file = self.file(name)?;
        std::fs::write(path, &file.data)?;
        Ok(())
    }
}
