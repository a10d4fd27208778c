//! Transport module
//!
//! Narrow HTTP capability the core sends every request through.

pub mod headers;
pub mod http;
pub mod logging;
pub mod provider;

pub use http::HttpTransport;
pub use logging::RequestContext;
pub use provider::{Transport, TransportError, TransportRequest, TransportResponse};
