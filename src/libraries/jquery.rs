//! jQuery-style client: `$.ajax(options)`.
//!
//! Requests go through `ajax_settings.xhr`. Callbacks follow jQuery's
//! signatures:
//! - `success(data, text_status, xhr)`
//! - `error(xhr, text_status, error_thrown)`
//! - `complete(xhr, text_status)`
//!
//! `text_status` is one of `success`, `notmodified`, `nocontent`, `error`,
//! `timeout` or `parsererror`. `204`, `304` and `HEAD` responses are never
//! converted and pass empty text data. When JSON is expected (via `data_type`, or a JSON content
//! type when no `data_type` is given) but the body does not decode, the
//! request takes the error path with `parsererror`.

use crate::libraries::{Mode, TransportHook, TransportHost};
use crate::net::{append_query, encode_form, Callbacks, HttpTransport, RequestParts, Response, StatusPolicy, TransportHandle};
use http::Method;
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

/// Expected type of the response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Text,
    Json,
}

/// Decoded response body handed to `success`.
#[derive(Debug, Clone, PartialEq)]
pub enum JQueryData {
    Text(String),
    Json(Value),
}

pub type SuccessFn = Box<dyn FnMut(&JQueryData, &str, &Response)>;
pub type ErrorFn = Box<dyn FnMut(&Response, &str, Option<&str>)>;
pub type CompleteFn = Box<dyn FnMut(&Response, &str)>;

/// Global defaults, `jQuery.ajaxSettings`.
#[derive(Debug)]
pub struct AjaxSettings {
    /// Transport hook.
    pub xhr: TransportHook,
    pub timeout: Option<Duration>,
    /// Added to every request unless the request sets the same header.
    pub headers: Vec<(String, String)>,
}

#[derive(Debug)]
pub struct JQuery {
    pub ajax_settings: AjaxSettings,
}

impl Default for JQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl JQuery {
    pub fn new() -> Self {
        Self::with_timeout(None)
    }

    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        let transport = HttpTransport::new(timeout, StatusPolicy::HttpSuccess).handle();
        Self {
            ajax_settings: AjaxSettings {
                xhr: TransportHook::new(transport),
                timeout,
                headers: vec![("X-Requested-With".to_string(), "XMLHttpRequest".to_string())],
            },
        }
    }

    /// Issues a request, `$.ajax(options)`.
    pub fn ajax(&self, options: JQueryAjaxOptions) {
        let JQueryAjaxOptions { url, method, headers, data, data_type, success, error, complete } = options;

        let query = encode_form(&data);
        let is_head = method == Method::HEAD;
        let sends_body = !(method == Method::GET || is_head);

        let mut parts = if sends_body {
            RequestParts::new(method, url)
        } else {
            RequestParts::new(method, append_query(&url, &query))
        };
        for (name, value) in &self.ajax_settings.headers {
            if !headers.iter().any(|(n, _)| n.eq_ignore_ascii_case(name)) {
                parts = parts.header(name, value);
            }
        }
        if sends_body && !query.is_empty() {
            parts = parts.header("Content-Type", FORM_CONTENT_TYPE).body(query);
        }
        for (name, value) in &headers {
            parts = parts.header(name, value);
        }

        let handlers = Rc::new(RefCell::new(Handlers {
            success,
            error,
            complete,
            data_type,
            is_head,
            text_status: "error",
        }));
        let (on_success, on_failure, on_complete) = (handlers.clone(), handlers.clone(), handlers);

        let callbacks = Callbacks::new()
            .on_success(move |xhr| on_success.borrow_mut().succeed(xhr))
            .on_failure(move |xhr| on_failure.borrow_mut().fail(xhr))
            .on_complete(move |xhr| on_complete.borrow_mut().finish(xhr));

        self.ajax_settings.xhr.get().issue(parts, callbacks);
    }
}

impl TransportHost for JQuery {
    fn mode(&self) -> Mode {
        Mode::JQuery
    }

    fn transport(&self) -> TransportHandle {
        self.ajax_settings.xhr.get()
    }

    fn swap_transport(&self, transport: TransportHandle) -> TransportHandle {
        self.ajax_settings.xhr.replace(transport)
    }

    fn status_policy(&self) -> StatusPolicy {
        StatusPolicy::HttpSuccess
    }

    fn timeout(&self) -> Option<Duration> {
        self.ajax_settings.timeout
    }
}

struct Handlers {
    success: Option<SuccessFn>,
    error: Option<ErrorFn>,
    complete: Option<CompleteFn>,
    data_type: Option<DataType>,
    is_head: bool,
    text_status: &'static str,
}

impl Handlers {
    fn succeed(&mut self, xhr: &Response) {
        // Bodiless outcomes skip conversion, whatever the content type says.
        let bodiless = match xhr.status {
            Some(204) => Some("nocontent"),
            Some(304) => Some("notmodified"),
            _ if self.is_head => Some("nocontent"),
            _ => None,
        };
        if let Some(text_status) = bodiless {
            self.text_status = text_status;
            if let Some(success) = self.success.as_mut() {
                success(&JQueryData::Text(String::new()), text_status, xhr);
            }
            return;
        }

        let wants_json = match self.data_type {
            Some(DataType::Json) => true,
            Some(DataType::Text) => false,
            None => xhr.is_json(),
        };

        let data = if wants_json {
            match xhr.json() {
                Ok(value) => JQueryData::Json(value),
                Err(e) => {
                    self.text_status = "parsererror";
                    let thrown = e.to_string();
                    if let Some(error) = self.error.as_mut() {
                        error(xhr, "parsererror", Some(thrown.as_str()));
                    }
                    return;
                }
            }
        } else {
            JQueryData::Text(xhr.response_text.clone())
        };

        self.text_status = "success";
        if let Some(success) = self.success.as_mut() {
            success(&data, self.text_status, xhr);
        }
    }

    fn fail(&mut self, xhr: &Response) {
        let error_thrown = if xhr.timed_out {
            self.text_status = "timeout";
            Some("timeout")
        } else {
            self.text_status = "error";
            Some(xhr.status_text.as_str()).filter(|s| !s.is_empty())
        };
        if let Some(error) = self.error.as_mut() {
            error(xhr, self.text_status, error_thrown);
        }
    }

    fn finish(&mut self, xhr: &Response) {
        if let Some(complete) = self.complete.as_mut() {
            complete(xhr, self.text_status);
        }
    }
}

/// Options for [`JQuery::ajax`].
pub struct JQueryAjaxOptions {
    url: String,
    method: Method,
    headers: Vec<(String, String)>,
    data: Vec<(String, String)>,
    data_type: Option<DataType>,
    success: Option<SuccessFn>,
    error: Option<ErrorFn>,
    complete: Option<CompleteFn>,
}

impl JQueryAjaxOptions {
    pub fn new<S: Into<String>>(url: S) -> Self {
        Self {
            url: url.into(),
            method: Method::GET,
            headers: Vec::new(),
            data: Vec::new(),
            data_type: None,
            success: None,
            error: None,
            complete: None,
        }
    }

    /// Request method, `type` in jQuery. Defaults to `GET`.
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn header<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Adds a form field. Sent as query string for `GET`/`HEAD`, as the body otherwise.
    pub fn data<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.data.push((name.into(), value.into()));
        self
    }

    pub fn data_type(mut self, data_type: DataType) -> Self {
        self.data_type = Some(data_type);
        self
    }

    pub fn success(mut self, f: impl FnMut(&JQueryData, &str, &Response) + 'static) -> Self {
        self.success = Some(Box::new(f));
        self
    }

    pub fn error(mut self, f: impl FnMut(&Response, &str, Option<&str>) + 'static) -> Self {
        self.error = Some(Box::new(f));
        self
    }

    pub fn complete(mut self, f: impl FnMut(&Response, &str) + 'static) -> Self {
        self.complete = Some(Box::new(f));
        self
    }
}
