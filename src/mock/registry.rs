use crate::mock::FakeRequestHandle;
use std::cell::RefCell;

/// Ordered list of fake requests, in issuance order.
///
/// There is no identity beyond position: the registry never deduplicates and
/// never reorders. Not internally synchronized; single-threaded use only.
#[derive(Debug, Default)]
pub struct RequestRegistry {
    requests: RefCell<Vec<FakeRequestHandle>>,
}

impl RequestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&self, request: FakeRequestHandle) {
        self.requests.borrow_mut().push(request);
    }

    /// The last request issued, or `None` when the registry is empty.
    pub fn most_recent(&self) -> Option<FakeRequestHandle> {
        self.requests.borrow().last().cloned()
    }

    pub fn get(&self, index: usize) -> Option<FakeRequestHandle> {
        self.requests.borrow().get(index).cloned()
    }

    /// Snapshot of all requests. Later enqueues are not reflected.
    pub fn all(&self) -> Vec<FakeRequestHandle> {
        self.requests.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.requests.borrow_mut().clear();
    }
}
