//! The transport seam.
//!
//! Client libraries never talk to the network themselves. They hand every
//! request to the [`Transport`] currently sitting in their transport hook.
//! Out of the box that is an [`HttpTransport`]; a mock session replaces it
//! with a [`MockTransport`](crate::mock::MockTransport) that records the
//! request instead.

use crate::net::{fetch, status_text_for, Callbacks, RequestParts, Response, StatusPolicy};
use http::HeaderMap;
use std::cell::OnceCell;
use std::rc::Rc;
use std::time::Duration;
use tokio::runtime::Runtime;

/// Anything able to carry a request and eventually report its outcome
/// through the supplied callbacks.
pub trait Transport {
    fn issue(&self, request: RequestParts, callbacks: Callbacks);
}

/// Shared handle to a transport. Hook identity is `Rc::ptr_eq`.
pub type TransportHandle = Rc<dyn Transport>;

/// Transport that performs the request over the network.
///
/// Requests run to completion on a current-thread tokio runtime owned by the
/// transport, so callbacks fire before `issue` returns. The runtime and the
/// reqwest client are built on first use and reused afterwards. Issuing from
/// inside an async context reports a failure instead of blocking.
#[derive(Debug)]
pub struct HttpTransport {
    timeout: Option<Duration>,
    policy: StatusPolicy,
    runtime: OnceCell<Runtime>,
    client: OnceCell<reqwest::Client>,
}

impl HttpTransport {
    pub fn new(timeout: Option<Duration>, policy: StatusPolicy) -> Self {
        Self {
            timeout,
            policy,
            runtime: OnceCell::new(),
            client: OnceCell::new(),
        }
    }

    /// Wraps the transport in a handle suitable for a library hook.
    pub fn handle(self) -> TransportHandle {
        Rc::new(self)
    }

    fn runtime(&self) -> std::io::Result<&Runtime> {
        if let Some(rt) = self.runtime.get() {
            return Ok(rt);
        }
        let rt = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
        Ok(self.runtime.get_or_init(|| rt))
    }

    fn client(&self) -> Result<&reqwest::Client, reqwest::Error> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(self.client.get_or_init(|| client))
    }

    fn execute(&self, request: &RequestParts) -> Result<Response, reqwest::Error> {
        if tokio::runtime::Handle::try_current().is_ok() {
            log::error!("HttpTransport: cannot block inside an async context, dropping {} {}", request.method, request.url);
            return Ok(no_response(&request.url, false));
        }

        let runtime = match self.runtime() {
            Ok(rt) => rt,
            Err(e) => {
                log::error!("HttpTransport: cannot create runtime: {e}");
                return Ok(no_response(&request.url, false));
            }
        };
        let client = self.client()?;

        runtime.block_on(fetch(client, request))
    }
}

impl Transport for HttpTransport {
    fn issue(&self, request: RequestParts, mut callbacks: Callbacks) {
        log::debug!("HttpTransport: {} {}", request.method, request.url);

        let response = match self.execute(&request) {
            Ok(response) => response,
            Err(e) => {
                log::error!("HttpTransport: {} {} failed: {}", request.method, request.url, e);
                no_response(&request.url, e.is_timeout())
            }
        };

        callbacks.dispatch(self.policy.outcome(response.status), &response);
    }
}

fn no_response(url: &str, timed_out: bool) -> Response {
    Response {
        url: url.to_string(),
        status: None,
        status_text: status_text_for(None),
        headers: HeaderMap::new(),
        response_text: String::new(),
        timed_out,
    }
}
