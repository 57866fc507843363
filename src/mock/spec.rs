use http::{HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;
use std::collections::BTreeMap;

/// The response a test wants a fake request to receive.
///
/// A missing or zero `status` signals failure. A missing `content_type` falls
/// back to the session's default (`application/json` unless configured
/// otherwise). When `response_headers` is set it replaces the synthesized
/// `Content-Type` header entirely.
///
/// Specs deserialize from JSON with camelCase keys:
///
/// ```rust
/// use mock_ajax::ResponseSpec;
/// let spec = ResponseSpec::from_json(r#"{"status": 200, "contentType": "text/html", "responseText": "OK!"}"#).unwrap();
/// assert_eq!(spec, ResponseSpec::new().with_status(200).with_content_type("text/html").with_text("OK!"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResponseSpec {
    pub status: Option<u16>,
    pub content_type: Option<String>,
    pub response_text: String,
    pub response_headers: Option<BTreeMap<String, String>>,
}

impl ResponseSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_content_type<S: Into<String>>(mut self, content_type: S) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_text<S: Into<String>>(mut self, text: S) -> Self {
        self.response_text = text.into();
        self
    }

    pub fn with_header<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.response_headers
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Builds the response headers. Entries that are not valid HTTP are
    /// skipped with a warning.
    pub(crate) fn headers(&self, default_content_type: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();

        match &self.response_headers {
            Some(explicit) => {
                for (name, value) in explicit {
                    insert(&mut headers, name, value);
                }
            }
            None => {
                let ct = self.content_type.as_deref().unwrap_or(default_content_type);
                insert(&mut headers, http::header::CONTENT_TYPE.as_str(), ct);
            }
        }

        headers
    }
}

fn insert(headers: &mut HeaderMap, name: &str, value: &str) {
    match (HeaderName::try_from(name), HeaderValue::from_str(value)) {
        (Ok(name), Ok(value)) => {
            headers.append(name, value);
        }
        _ => log::warn!("ResponseSpec: skipping invalid header {name:?}: {value:?}"),
    }
}
