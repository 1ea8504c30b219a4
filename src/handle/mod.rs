//! Handle operations against the SURFsara Handle API
//!
//! ## Key Components
//!
//! - [`HandleClient`] - Validates a [`HandleConfig`](crate::config::HandleConfig) and dispatches one request
//! - [`HandlePayload`] - Deterministic JSON body with the URL and HS_ADMIN values
//! - [`HandleTransport`] - Seam for the HTTP layer; [`ReqwestTransport`] speaks mutual TLS
//! - [`OperationResult`] - Uniform outcome for configuration, transport and API failures
//!
//! ## Example
//!
//! ```rust,no_run
//! use handlebox::config::HandleConfig;
//! use handlebox::handle::HandleClient;
//!
//! # async fn run() {
//! let config = HandleConfig::builder()
//!     .key("/etc/handlebox/client.key")
//!     .cert("/etc/handlebox/client.crt")
//!     .handle_name("123456")
//!     .handle_url("https://repository.example.org/record/123456")
//!     .api_base_url("https://epic.example.org/api/handles")
//!     .prefix("21.T12995/TEST")
//!     .permissions("011111110011")
//!     .build();
//!
//! let result = HandleClient::new().set_handle(&config).await;
//! if !result.success {
//!     eprintln!("{}: {}", result.code, result.message);
//! }
//! # }
//! ```

mod client;
mod endpoint;
mod payload;
mod result;
mod transport;

pub use client::{DELETE_ACCEPTED, HandleClient, Operation, SET_ACCEPTED, build_request};
pub use endpoint::{handle_endpoint, set_handle_url};
pub use payload::{AdminValue, HandlePayload, HandleValue, ValueData};
pub use result::OperationResult;
pub use transport::{
    ClientTls, HandleRequest, HandleTransport, RecordingTransport, ReqwestTransport,
    TransportError, TransportResponse,
};
