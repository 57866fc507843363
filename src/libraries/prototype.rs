//! Prototype-style client: `new Ajax.Request(url, options)`.
//!
//! Requests go through `Ajax.getTransport`. Every callback receives the
//! transport (the response) and the decoded JSON body when the response is
//! served as `application/json`, `None` otherwise.
//!
//! Methods other than `GET` and `POST` are tunnelled as `POST` with a
//! `_method` parameter, the way Prototype does.

use crate::libraries::{Mode, TransportHook, TransportHost};
use crate::net::{append_query, encode_form, Callbacks, HttpTransport, RequestParts, Response, StatusPolicy, TransportHandle};
use http::Method;
use serde_json::Value;

pub const PROTOTYPE_VERSION: &str = "1.7";

const DEFAULT_ACCEPT: &str = "text/javascript, text/html, application/xml, text/xml, */*";

pub type PrototypeCallback = Box<dyn FnMut(&Response, Option<&Value>)>;

#[derive(Debug)]
pub struct Prototype {
    /// Transport hook, `Ajax.getTransport`.
    pub get_transport: TransportHook,
}

impl Default for Prototype {
    fn default() -> Self {
        Self::new()
    }
}

impl Prototype {
    pub fn new() -> Self {
        Self {
            get_transport: TransportHook::new(HttpTransport::new(None, StatusPolicy::Truthy).handle()),
        }
    }

    /// Issues a request, `new Ajax.Request(url, options)`.
    pub fn request<S: Into<String>>(&self, url: S, options: PrototypeRequestOptions) {
        let PrototypeRequestOptions {
            mut method,
            mut parameters,
            request_headers,
            content_type,
            post_body,
            on_success,
            on_failure,
            on_complete,
        } = options;

        if method != Method::GET && method != Method::POST {
            parameters.push(("_method".to_string(), method.as_str().to_ascii_lowercase()));
            method = Method::POST;
        }

        let query = encode_form(&parameters);
        let url = url.into();
        let mut parts = if method == Method::GET {
            RequestParts::new(method, append_query(&url, &query))
        } else {
            let body = post_body.unwrap_or(query);
            RequestParts::new(method, url)
                .header("Content-type", &format!("{content_type}; charset=UTF-8"))
                .body(body)
        };

        parts = parts
            .header("X-Requested-With", "XMLHttpRequest")
            .header("X-Prototype-Version", PROTOTYPE_VERSION)
            .header("Accept", DEFAULT_ACCEPT);
        for (name, value) in &request_headers {
            // Explicit headers replace the defaults.
            parts.headers.remove(name.as_str());
            parts = parts.header(name, value);
        }

        let callbacks = Callbacks::new()
            .on_success(with_json(on_success))
            .on_failure(with_json(on_failure))
            .on_complete(with_json(on_complete));

        self.get_transport.get().issue(parts, callbacks);
    }
}

fn with_json(mut callback: Option<PrototypeCallback>) -> impl FnMut(&Response) + 'static {
    move |transport: &Response| {
        if let Some(callback) = callback.as_mut() {
            let json = if transport.is_json() { transport.json().ok() } else { None };
            callback(transport, json.as_ref());
        }
    }
}

impl TransportHost for Prototype {
    fn mode(&self) -> Mode {
        Mode::Prototype
    }

    fn transport(&self) -> TransportHandle {
        self.get_transport.get()
    }

    fn swap_transport(&self, transport: TransportHandle) -> TransportHandle {
        self.get_transport.replace(transport)
    }
}

/// Options for [`Prototype::request`].
pub struct PrototypeRequestOptions {
    method: Method,
    parameters: Vec<(String, String)>,
    request_headers: Vec<(String, String)>,
    content_type: String,
    post_body: Option<String>,
    on_success: Option<PrototypeCallback>,
    on_failure: Option<PrototypeCallback>,
    on_complete: Option<PrototypeCallback>,
}

impl Default for PrototypeRequestOptions {
    fn default() -> Self {
        Self {
            method: Method::POST,
            parameters: Vec::new(),
            request_headers: Vec::new(),
            content_type: "application/x-www-form-urlencoded".to_string(),
            post_body: None,
            on_success: None,
            on_failure: None,
            on_complete: None,
        }
    }
}

impl PrototypeRequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults to `POST`.
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn parameter<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.parameters.push((name.into(), value.into()));
        self
    }

    pub fn request_header<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.request_headers.push((name.into(), value.into()));
        self
    }

    pub fn content_type<S: Into<String>>(mut self, content_type: S) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Raw body; replaces the encoded parameters for non-`GET` requests.
    pub fn post_body<S: Into<String>>(mut self, body: S) -> Self {
        self.post_body = Some(body.into());
        self
    }

    pub fn on_success(mut self, f: impl FnMut(&Response, Option<&Value>) + 'static) -> Self {
        self.on_success = Some(Box::new(f));
        self
    }

    pub fn on_failure(mut self, f: impl FnMut(&Response, Option<&Value>) + 'static) -> Self {
        self.on_failure = Some(Box::new(f));
        self
    }

    pub fn on_complete(mut self, f: impl FnMut(&Response, Option<&Value>) + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }
}
