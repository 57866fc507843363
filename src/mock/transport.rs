use crate::mock::{FakeRequest, RequestRegistry};
use crate::net::{Callbacks, RequestParts, StatusPolicy, Transport};
use std::rc::Rc;
use std::time::Duration;

/// Transport installed by a mock session. Records requests instead of
/// sending them; nothing fires until a test responds.
#[derive(Debug)]
pub struct MockTransport {
    registry: Rc<RequestRegistry>,
    policy: StatusPolicy,
    timeout: Duration,
    default_content_type: String,
}

impl MockTransport {
    pub fn new(
        registry: Rc<RequestRegistry>,
        policy: StatusPolicy,
        timeout: Duration,
        default_content_type: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            policy,
            timeout,
            default_content_type: default_content_type.into(),
        }
    }
}

impl Transport for MockTransport {
    fn issue(&self, request: RequestParts, callbacks: Callbacks) {
        log::debug!("MockTransport: queued {} {}", request.method, request.url);

        let fake = FakeRequest::new(request, callbacks, self.policy, self.timeout, self.default_content_type.as_str());
        self.registry.enqueue(Rc::new(fake));
    }
}
