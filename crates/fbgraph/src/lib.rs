//! # fbgraph
//!
//! "Log in with Facebook" for Rust web applications: the OAuth2
//! authorization-code dance plus a few reads against the Graph API.
//!
//! ```no_run
//! # async fn run() -> miette::Result<()> {
//! use fbgraph::{GraphAgent, oauth::AuthClient};
//!
//! let auth = AuthClient::new(
//!     "my-app-id",
//!     "my-app-secret",
//!     "https://example.com/auth/callback",
//!     ["public_profile", "email"],
//! )?;
//! // 1. redirect the browser here
//! let state = fbgraph::oauth::utils::generate_state();
//! let url = auth.authorization_url(Some(&state));
//! # let _ = url;
//! // 2. in the callback route, trade the code for a token
//! auth.exchange_code("code-from-query").await?;
//! // 3. read the profile
//! let agent = GraphAgent::from(auth);
//! let me = agent.user().await?;
//! println!("hello {}", me.name.as_deref().unwrap_or("stranger"));
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod types;

pub use fbgraph_common as common;
pub use fbgraph_oauth as oauth;

pub use agent::GraphAgent;
pub use fbgraph_common::error::{ClientError, Result};
pub use types::{PictureData, PictureInfo, PictureSize, UserInfo};
