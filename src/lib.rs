//! Mock AJAX transport for unit tests.
//!
//! Client code issues requests through one of the modelled client libraries
//! ([`JQuery`], [`Prototype`] or Sencha Touch's [`Ext`]). Once a [`MockAjax`]
//! session is installed into that library, requests are recorded instead of
//! sent, and the test answers each one by hand with
//! [`FakeRequest::respond`] or [`FakeRequest::respond_with_timeout`]. The
//! caller's callbacks fire synchronously, before `respond` returns.

pub mod config;
pub mod errors;
pub mod libraries;
pub mod mock;
pub mod net;

#[cfg(test)]
mod testing;

pub use config::{MockAjaxConfig, MockAjaxConfigError};
pub use errors::MockAjaxError;
pub use libraries::{Environment, Ext, JQuery, Mode, Prototype, TransportHost};
pub use mock::{FakeRequest, FakeRequestHandle, MockAjax, RequestRegistry, ResponseSpec};
