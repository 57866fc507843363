//! Network layer: the request/response model shared by the real and the mock
//! transports, and the [`Transport`] seam client libraries issue requests
//! through.

mod fetch;
mod request;
mod response;
mod status;
mod transport;

pub use fetch::fetch;
pub use request::{Callback, Callbacks, RequestParts};
pub use response::Response;
pub use status::{Outcome, StatusPolicy};
pub use transport::{HttpTransport, Transport, TransportHandle};

pub(crate) use request::{append_query, encode_form};
pub(crate) use response::status_text_for;
