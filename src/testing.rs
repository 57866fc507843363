//! Test helpers: a call-recording spy and log setup.

use crate::net::Response;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Routes `log` output through the test harness. Safe to call repeatedly.
pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Records every call made through it. Clones share the same record.
pub(crate) struct Spy<T = Response> {
    name: &'static str,
    calls: Rc<RefCell<Vec<T>>>,
}

impl<T> Clone for Spy<T> {
    fn clone(&self) -> Self {
        Self { name: self.name, calls: self.calls.clone() }
    }
}

impl<T> fmt::Debug for Spy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Spy({}, {} calls)", self.name, self.calls.borrow().len())
    }
}

impl<T: Clone + 'static> Spy<T> {
    pub(crate) fn new(name: &'static str) -> Self {
        Self { name, calls: Rc::new(RefCell::new(Vec::new())) }
    }

    pub(crate) fn record(&self, call: T) {
        self.calls.borrow_mut().push(call);
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub(crate) fn was_called(&self) -> bool {
        self.call_count() > 0
    }

    pub(crate) fn most_recent_call(&self) -> Option<T> {
        self.calls.borrow().last().cloned()
    }
}

impl Spy<Response> {
    pub(crate) fn callback(&self) -> impl FnMut(&Response) + 'static {
        let spy = self.clone();
        move |response: &Response| spy.record(response.clone())
    }
}
