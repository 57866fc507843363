//! Sencha-Touch-style client: `Ext.Ajax.request(options)`.
//!
//! `Ext.Ajax` is a singleton [`Connection`]; its transport hook stands in for
//! `Ext.data.Connection.prototype.getXhrInstance`. Callbacks:
//! - `success(response)`
//! - `failure(response)`
//! - `callback(success, response)`, always last
//!
//! With `disable_caching` (the default) `GET` requests get a `_dc=<epoch
//! millis>` parameter so browsers cannot serve them from cache.

use crate::libraries::{Mode, TransportHook, TransportHost};
use crate::net::{append_query, encode_form, Callbacks, HttpTransport, RequestParts, Response, StatusPolicy, TransportHandle};
use http::Method;
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use time::OffsetDateTime;

pub const DISABLE_CACHING_PARAM: &str = "_dc";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";
const JSON_CONTENT_TYPE: &str = "application/json";

pub type ResponseFn = Box<dyn FnMut(&Response)>;
pub type CallbackFn = Box<dyn FnMut(bool, &Response)>;

/// Decodes a JSON string, `Ext.decode`.
pub fn decode(text: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(text)
}

#[derive(Debug)]
pub struct Connection {
    /// Transport hook, `getXhrInstance`.
    pub get_xhr_instance: TransportHook,
    pub timeout: Duration,
    /// Sent with every request unless the request overrides them.
    pub default_headers: Vec<(String, String)>,
}

impl Default for Connection {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl Connection {
    pub fn new(timeout: Duration) -> Self {
        Self {
            get_xhr_instance: TransportHook::new(HttpTransport::new(Some(timeout), StatusPolicy::HttpSuccess).handle()),
            timeout,
            default_headers: vec![("X-Requested-With".to_string(), "XMLHttpRequest".to_string())],
        }
    }

    pub fn request(&self, options: ExtRequestOptions) {
        let ExtRequestOptions {
            url,
            method,
            headers,
            params,
            json_data,
            disable_caching,
            success,
            failure,
            callback,
        } = options;

        let has_body = !params.is_empty() || json_data.is_some();
        let method = method.unwrap_or(if has_body { Method::POST } else { Method::GET });
        let query = encode_form(&params);

        let mut url = url;
        let mut body = None;
        let mut content_type = None;
        if method == Method::GET {
            url = append_query(&url, &query);
        } else if let Some(json) = &json_data {
            url = append_query(&url, &query);
            body = Some(json.to_string());
            content_type = Some(JSON_CONTENT_TYPE);
        } else if !query.is_empty() {
            body = Some(query);
            content_type = Some(FORM_CONTENT_TYPE);
        }
        if disable_caching && method == Method::GET {
            let dc = format!("{DISABLE_CACHING_PARAM}={}", now_millis());
            url = append_query(&url, &dc);
        }

        let mut parts = RequestParts::new(method, url);
        for (name, value) in &self.default_headers {
            if !headers.iter().any(|(n, _)| n.eq_ignore_ascii_case(name)) {
                parts = parts.header(name, value);
            }
        }
        if let Some(ct) = content_type {
            if !headers.iter().any(|(n, _)| n.eq_ignore_ascii_case("content-type")) {
                parts = parts.header("Content-Type", ct);
            }
        }
        for (name, value) in &headers {
            parts = parts.header(name, value);
        }
        if let Some(body) = body {
            parts = parts.body(body);
        }

        let handlers = Rc::new(RefCell::new(Handlers { success, failure, callback, succeeded: false }));
        let (on_success, on_failure, on_complete) = (handlers.clone(), handlers.clone(), handlers);

        let callbacks = Callbacks::new()
            .on_success(move |response| on_success.borrow_mut().succeed(response))
            .on_failure(move |response| on_failure.borrow_mut().fail(response))
            .on_complete(move |response| on_complete.borrow_mut().finish(response));

        self.get_xhr_instance.get().issue(parts, callbacks);
    }
}

fn now_millis() -> i128 {
    OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000
}

struct Handlers {
    success: Option<ResponseFn>,
    failure: Option<ResponseFn>,
    callback: Option<CallbackFn>,
    succeeded: bool,
}

impl Handlers {
    fn succeed(&mut self, response: &Response) {
        self.succeeded = true;
        if let Some(success) = self.success.as_mut() {
            success(response);
        }
    }

    fn fail(&mut self, response: &Response) {
        self.succeeded = false;
        if let Some(failure) = self.failure.as_mut() {
            failure(response);
        }
    }

    fn finish(&mut self, response: &Response) {
        if let Some(callback) = self.callback.as_mut() {
            callback(self.succeeded, response);
        }
    }
}

/// The `Ext` namespace; only `Ext.Ajax` is modelled.
#[derive(Debug, Default)]
pub struct Ext {
    pub ajax: Connection,
}

impl Ext {
    pub fn new() -> Self {
        Self::default()
    }

    /// `Ext.Ajax.request(options)`.
    pub fn ajax_request(&self, options: ExtRequestOptions) {
        self.ajax.request(options);
    }
}

impl TransportHost for Ext {
    fn mode(&self) -> Mode {
        Mode::SenchaTouch
    }

    fn transport(&self) -> TransportHandle {
        self.ajax.get_xhr_instance.get()
    }

    fn swap_transport(&self, transport: TransportHandle) -> TransportHandle {
        self.ajax.get_xhr_instance.replace(transport)
    }

    fn status_policy(&self) -> StatusPolicy {
        StatusPolicy::HttpSuccess
    }

    fn timeout(&self) -> Option<Duration> {
        Some(self.ajax.timeout)
    }
}

/// Options for [`Connection::request`].
pub struct ExtRequestOptions {
    url: String,
    method: Option<Method>,
    headers: Vec<(String, String)>,
    params: Vec<(String, String)>,
    json_data: Option<Value>,
    disable_caching: bool,
    success: Option<ResponseFn>,
    failure: Option<ResponseFn>,
    callback: Option<CallbackFn>,
}

impl ExtRequestOptions {
    pub fn new<S: Into<String>>(url: S) -> Self {
        Self {
            url: url.into(),
            method: None,
            headers: Vec::new(),
            params: Vec::new(),
            json_data: None,
            disable_caching: true,
            success: None,
            failure: None,
            callback: None,
        }
    }

    /// Defaults to `GET`, or `POST` when params or JSON data are given.
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn header<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn param<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// JSON body; params then move to the query string.
    pub fn json_data(mut self, data: Value) -> Self {
        self.json_data = Some(data);
        self
    }

    pub fn disable_caching(mut self, on: bool) -> Self {
        self.disable_caching = on;
        self
    }

    pub fn success(mut self, f: impl FnMut(&Response) + 'static) -> Self {
        self.success = Some(Box::new(f));
        self
    }

    pub fn failure(mut self, f: impl FnMut(&Response) + 'static) -> Self {
        self.failure = Some(Box::new(f));
        self
    }

    pub fn callback(mut self, f: impl FnMut(bool, &Response) + 'static) -> Self {
        self.callback = Some(Box::new(f));
        self
    }
}
