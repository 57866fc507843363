use crate::mock::ResponseSpec;
use crate::net::{status_text_for, Callbacks, Outcome, RequestParts, Response, StatusPolicy};
use http::{HeaderMap, Method};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

/// Shared handle to a fake request. The registry and the test hold the same
/// instance, so identity is `Rc::ptr_eq`.
pub type FakeRequestHandle = Rc<FakeRequest>;

/// A request captured by the mock transport, waiting for a test to answer it.
///
/// Everything about the request is immutable. The only state that changes is
/// the recorded [`Response`], set by [`respond`](Self::respond) or
/// [`respond_with_timeout`](Self::respond_with_timeout).
#[derive(Debug)]
pub struct FakeRequest {
    parts: RequestParts,
    policy: StatusPolicy,
    timeout: Duration,
    default_content_type: String,
    callbacks: RefCell<Callbacks>,
    dispatching: Cell<bool>,
    response: RefCell<Option<Response>>,
}

impl FakeRequest {
    pub fn new(
        parts: RequestParts,
        callbacks: Callbacks,
        policy: StatusPolicy,
        timeout: Duration,
        default_content_type: impl Into<String>,
    ) -> Self {
        Self {
            parts,
            policy,
            timeout,
            default_content_type: default_content_type.into(),
            callbacks: RefCell::new(callbacks),
            dispatching: Cell::new(false),
            response: RefCell::new(None),
        }
    }

    pub fn url(&self) -> &str {
        &self.parts.url
    }

    pub fn method(&self) -> &Method {
        &self.parts.method
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.parts.headers
    }

    pub fn request_header(&self, name: &str) -> Option<&str> {
        self.parts.request_header(name)
    }

    pub fn body(&self) -> Option<&str> {
        self.parts.body.as_deref()
    }

    /// Timeout the issuing library would have applied.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn status_policy(&self) -> StatusPolicy {
        self.policy
    }

    /// The last simulated response, if any.
    pub fn response(&self) -> Option<Response> {
        self.response.borrow().clone()
    }

    pub fn status(&self) -> Option<u16> {
        self.response.borrow().as_ref().and_then(|r| r.status)
    }

    pub fn response_text(&self) -> Option<String> {
        self.response.borrow().as_ref().map(|r| r.response_text.clone())
    }

    pub fn is_responded(&self) -> bool {
        self.response.borrow().is_some()
    }

    /// Simulates a server response.
    ///
    /// Success or failure is decided from `spec.status` by the request's
    /// [`StatusPolicy`]. The matching callback fires first, then complete.
    pub fn respond(&self, spec: &ResponseSpec) {
        let response = Response {
            url: self.parts.url.clone(),
            status: spec.status,
            status_text: status_text_for(spec.status),
            headers: spec.headers(&self.default_content_type),
            response_text: spec.response_text.clone(),
            timed_out: false,
        };
        let outcome = self.policy.outcome(spec.status);

        log::debug!("FakeRequest: {} {} responded {:?} ({:?})", self.parts.method, self.parts.url, spec.status, outcome);
        self.simulate(response, outcome);
    }

    /// Simulates the request timing out. Always a failure; any `status` in
    /// `spec` is ignored and the response carries none.
    pub fn respond_with_timeout(&self, spec: &ResponseSpec) {
        let response = Response {
            url: self.parts.url.clone(),
            status: None,
            status_text: status_text_for(None),
            headers: spec.headers(&self.default_content_type),
            response_text: spec.response_text.clone(),
            timed_out: true,
        };

        log::debug!("FakeRequest: {} {} timed out after {:?}", self.parts.method, self.parts.url, self.timeout);
        self.simulate(response, Outcome::Failure);
    }

    fn simulate(&self, response: Response, outcome: Outcome) {
        if self.is_responded() {
            log::warn!("FakeRequest: {} {} already has a response, responding again", self.parts.method, self.parts.url);
        }
        *self.response.borrow_mut() = Some(response.clone());

        // A response from inside a callback is recorded but dispatches nothing.
        if self.dispatching.get() {
            log::warn!("FakeRequest: {} {} responded from its own callback, callbacks not fired", self.parts.method, self.parts.url);
            return;
        }

        // Callbacks are taken out while they run so they may use this request.
        let mut callbacks = self.callbacks.take();
        self.dispatching.set(true);
        callbacks.dispatch(outcome, &response);
        self.dispatching.set(false);
        *self.callbacks.borrow_mut() = callbacks;
    }
}
