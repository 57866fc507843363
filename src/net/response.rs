//! Minimal XHR-style response model.
//!
//! This struct is what every caller callback receives, whether the request
//! went over the network through [`HttpTransport`](crate::net::HttpTransport)
//! or was answered by hand through a
//! [`FakeRequest`](crate::mock::FakeRequest). It carries the final URL, the
//! status code and reason, response headers and the body as text.
//!
//! ## Notes
//! - `status` is `None` when no response was received at all (a timeout or a
//!   network error). A simulated `status: 0` is kept as `Some(0)`.
//! - `headers` is an `http::HeaderMap`, which is **case-insensitive** for
//!   header names, so `get_response_header("Content-type")` and
//!   `get_response_header("content-type")` are equivalent.
//! - `status_text` is derived from the status code's canonical reason phrase
//!   and is `"Unknown"` for non-standard codes, empty when there is no status.
//!
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;

/// Simple structure for received (or simulated) responses.
#[derive(Debug, Clone)]
pub struct Response {
    /// URL the request was issued for (final URL after redirects for real requests).
    pub url: String,

    /// Numeric HTTP status code, if any.
    pub status: Option<u16>,

    /// Human-readable reason phrase (e.g., `"OK"`, `"Not Found"`).
    pub status_text: String,

    /// Response headers as a case-insensitive map.
    pub headers: HeaderMap,

    /// Response body, verbatim.
    pub response_text: String,

    /// Set when the request was abandoned because it timed out.
    pub timed_out: bool,
}

impl Response {
    /// Returns the value of a response header, or `None` when absent or not
    /// valid visible ASCII.
    pub fn get_response_header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.get_response_header(http::header::CONTENT_TYPE.as_str())
    }

    /// True when the content type's essence is `application/json`, ignoring
    /// parameters such as `charset`.
    pub fn is_json(&self) -> bool {
        self.content_type()
            .and_then(|ct| ct.split(';').next())
            .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("application/json"))
    }

    /// Decodes the body as JSON.
    pub fn json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.response_text)
    }

    /// Decodes the body as JSON into `T`.
    pub fn json_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.response_text)
    }
}

pub(crate) fn status_text_for(status: Option<u16>) -> String {
    match status {
        None | Some(0) => String::new(),
        Some(code) => StatusCode::from_u16(code)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown")
            .to_string(),
    }
}
