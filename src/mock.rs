//! Mock side of the transport seam.
//!
//! - [`MockAjax`]: the session object tests own. Installs the mock into a
//!   client library and exposes the request registry.
//! - [`RequestRegistry`]: ordered list of every request issued while the mock
//!   was installed.
//! - [`FakeRequest`]: one recorded request, answered by hand with
//!   [`FakeRequest::respond`] or [`FakeRequest::respond_with_timeout`].
//! - [`ResponseSpec`]: what a test wants the fake server to answer.
//!
//! # Example
//! ```rust
//! use std::rc::Rc;
//! use mock_ajax::libraries::sencha_touch::{Ext, ExtRequestOptions};
//! use mock_ajax::{Environment, MockAjax, ResponseSpec};
//!
//! # fn main() -> Result<(), mock_ajax::MockAjaxError> {
//! let ext = Rc::new(Ext::new());
//! let env = Environment::new().with_ext(ext.clone());
//!
//! let mut mock = MockAjax::new(None);
//! mock.use_mock(&env)?;
//!
//! ext.ajax_request(ExtRequestOptions::new("example.com/someApi").disable_caching(false));
//!
//! let request = mock.most_recent_request()?.expect("request was queued");
//! assert_eq!(request.url(), "example.com/someApi");
//! request.respond(&ResponseSpec::new().with_status(200).with_text("OK!"));
//! # Ok(()) }
//! ```

mod fake_request;
mod registry;
mod session;
mod spec;
mod transport;

pub use fake_request::{FakeRequest, FakeRequestHandle};
pub use registry::RequestRegistry;
pub use session::MockAjax;
pub use spec::ResponseSpec;
pub use transport::MockTransport;
