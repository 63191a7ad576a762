use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Body of the token endpoint.
///
/// Classic API versions answer `access_token=..&expires=<secs>&token_type=bearer`
/// as a form body; newer ones send the same fields as JSON with `expires_in`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct OAuthTokenResponse {
    pub access_token: SmolStr,
    /// Lifetime in seconds, relative to when the response was received.
    #[serde(alias = "expires_in")]
    pub expires: u64,
    pub token_type: Option<SmolStr>,
}
