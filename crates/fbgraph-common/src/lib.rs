//! Shared building blocks for the fbgraph crates: the HTTP transport seam and
//! the error taxonomy every operation reports through.

#![warn(missing_docs)]
pub use smol_str;
pub use url;

pub mod error;
/// HTTP client abstraction used by fbgraph crates.
pub mod http_client;

pub use error::{ClientError, ConfigError, DecodeError, ProviderError, Result, TransportError};
pub use http_client::HttpClient;
