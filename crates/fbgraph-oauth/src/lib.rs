//! Facebook OAuth2 authorization-code login.
//!
//! [`AuthClient`](client::AuthClient) builds the login dialog URL, trades the
//! returned code for an access token and asks the provider about a token's
//! validity. Profile reads on top of the session live in the `fbgraph` crate.

pub mod client;
pub mod config;
pub mod request;
pub mod session;
pub mod types;
pub mod utils;

#[cfg(feature = "loopback")]
pub mod loopback;

pub use client::AuthClient;
pub use config::{ClientConfig, ClientOptions};
pub use fbgraph_common::error::{ClientError, Result};
pub use session::SessionToken;
pub use types::{CallbackParams, IntrospectionResult};
