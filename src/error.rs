use std::fmt;
use std::io;

/// Failures surfaced by the request context.
///
/// Parse failures of typed accessors are *not* represented here; those
/// default to the zero value. This enum covers genuine inability to produce
/// the requested response (serialization, rendering) and contract violations
/// (redirect status out of range, missing upload field).
#[derive(Debug)]
pub enum Error {
    /// JSON serialization failed
    Json(serde_json::Error),
    /// XML serialization failed
    Xml(quick_xml::SeError),
    /// Template rendering failed
    Render(minijinja::Error),
    /// `render`/`html`/`fetch` called with no template engine configured
    NoTemplateEngine,
    /// Redirect status code outside the 300..=307 range
    InvalidRedirectStatus(u16),
    /// No uploaded file under the given multipart field name
    MissingUpload(String),
    /// I/O failure (e.g. writing an upload to disk)
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Json(e) => write!(f, "json serialization failed: {e}"),
            Error::Xml(e) => write!(f, "xml serialization failed: {e}"),
            Error::Render(e) => write!(f, "template rendering failed: {e}"),
            Error::NoTemplateEngine => write!(f, "no template engine configured"),
            Error::InvalidRedirectStatus(code) => {
                write!(f, "invalid redirect status code: {code}")
            }
            Error::MissingUpload(name) => {
                write!(f, "no uploaded file for form field '{name}'")
            }
            Error::Io(e) => write!(f, "i/o error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Json(e) => Some(e),
            Error::Xml(e) => Some(e),
            Error::Render(e) => Some(e),
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}

impl From<quick_xml::SeError> for Error {
    fn from(e: quick_xml::SeError) -> Self {
        Error::Xml(e)
    }
}

impl From<minijinja::Error> for Error {
    fn from(e: minijinja::Error) -> Self {
        Error::Render(e)
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}
