use crate::net::{Outcome, Response};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use std::fmt;

/// Everything a transport needs to know to issue a request.
///
/// URLs are kept verbatim; relative URLs like `example.com/someApi` are fine
/// for fake requests.
#[derive(Debug, Clone)]
pub struct RequestParts {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

impl RequestParts {
    pub fn new<S: Into<String>>(method: Method, url: S) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Adds a request header. Names or values that are not valid HTTP are
    /// skipped with a warning.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        match (HeaderName::try_from(name), HeaderValue::from_str(value)) {
            (Ok(name), Ok(value)) => {
                self.headers.append(name, value);
            }
            _ => log::warn!("RequestParts: skipping invalid header {name:?}: {value:?}"),
        }
        self
    }

    pub fn body<S: Into<String>>(mut self, body: S) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Returns the value of a request header, if set.
    pub fn request_header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// A caller callback. All three kinds receive the response.
pub type Callback = Box<dyn FnMut(&Response)>;

/// The success/failure/complete callbacks supplied when a request is issued.
#[derive(Default)]
pub struct Callbacks {
    success: Option<Callback>,
    failure: Option<Callback>,
    complete: Option<Callback>,
}

impl Callbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_success(mut self, f: impl FnMut(&Response) + 'static) -> Self {
        self.success = Some(Box::new(f));
        self
    }

    pub fn on_failure(mut self, f: impl FnMut(&Response) + 'static) -> Self {
        self.failure = Some(Box::new(f));
        self
    }

    pub fn on_complete(mut self, f: impl FnMut(&Response) + 'static) -> Self {
        self.complete = Some(Box::new(f));
        self
    }

    /// Invokes the success or failure callback, then the complete callback.
    pub fn dispatch(&mut self, outcome: Outcome, response: &Response) {
        let callback = match outcome {
            Outcome::Success => self.success.as_mut(),
            Outcome::Failure => self.failure.as_mut(),
        };
        if let Some(callback) = callback {
            callback(response);
        }
        if let Some(complete) = self.complete.as_mut() {
            complete(response);
        }
    }
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("success", &self.success.is_some())
            .field("failure", &self.failure.is_some())
            .field("complete", &self.complete.is_some())
            .finish()
    }
}

/// Form-encodes `pairs` (`a=1&b=two+words`).
pub(crate) fn encode_form(pairs: &[(String, String)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

/// Appends an already encoded query to `url`, keeping any existing query.
pub(crate) fn append_query(url: &str, query: &str) -> String {
    if query.is_empty() {
        return url.to_string();
    }
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{url}{sep}{query}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::status_text_for;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn response(status: Option<u16>) -> Response {
        Response {
            url: "example.com/someApi".into(),
            status,
            status_text: status_text_for(status),
            headers: HeaderMap::new(),
            response_text: String::new(),
            timed_out: false,
        }
    }

    fn recording() -> (Rc<RefCell<Vec<&'static str>>>, Callbacks) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let (s, f, c) = (log.clone(), log.clone(), log.clone());
        let callbacks = Callbacks::new()
            .on_success(move |_| s.borrow_mut().push("success"))
            .on_failure(move |_| f.borrow_mut().push("failure"))
            .on_complete(move |_| c.borrow_mut().push("complete"));
        (log, callbacks)
    }

    #[test]
    fn dispatch_success_then_complete() {
        let (log, mut callbacks) = recording();
        callbacks.dispatch(Outcome::Success, &response(Some(200)));
        assert_eq!(*log.borrow(), vec!["success", "complete"]);
    }

    #[test]
    fn dispatch_failure_then_complete() {
        let (log, mut callbacks) = recording();
        callbacks.dispatch(Outcome::Failure, &response(None));
        assert_eq!(*log.borrow(), vec!["failure", "complete"]);
    }

    #[test]
    fn missing_callbacks_are_skipped() {
        let mut callbacks = Callbacks::new();
        callbacks.dispatch(Outcome::Success, &response(Some(200)));
        assert_eq!(
            format!("{callbacks:?}"),
            "Callbacks { success: false, failure: false, complete: false }"
        );
    }

    #[test]
    fn header_builder_skips_invalid_entries() {
        let parts = RequestParts::new(Method::GET, "example.com/someApi")
            .header("Accept", "text/html")
            .header("bad header", "x")
            .header("X-Ok", "line\nbreak");
        assert_eq!(parts.request_header("accept"), Some("text/html"));
        assert_eq!(parts.headers.len(), 1);
    }

    #[test]
    fn form_encoding_and_query_appending() {
        let pairs = vec![("a".to_string(), "1".to_string()), ("q".to_string(), "two words".to_string())];
        let query = encode_form(&pairs);
        assert_eq!(query, "a=1&q=two+words");
        assert_eq!(append_query("example.com/someApi", &query), "example.com/someApi?a=1&q=two+words");
        assert_eq!(append_query("example.com/someApi?x=y", "a=1"), "example.com/someApi?x=y&a=1");
        assert_eq!(append_query("example.com/someApi", ""), "example.com/someApi");
    }
}
