use fbgraph_common::error::{ClientError, Result};
use serde::Deserialize;
use smol_str::SmolStr;
use url::Url;

/// Query parameters the provider appends to the redirect URI.
///
/// On approval `code` (and `state`) are set; when the user declines, `error`,
/// `error_reason` and `error_description` are.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct CallbackParams {
    pub code: Option<SmolStr>,
    pub state: Option<SmolStr>,
    pub error: Option<SmolStr>,
    pub error_reason: Option<SmolStr>,
    pub error_description: Option<SmolStr>,
}

impl CallbackParams {
    /// Parse a raw query string (leading `?` allowed).
    pub fn from_query(query: &str) -> Result<Self> {
        serde_html_form::from_str(query.trim_start_matches('?'))
            .map_err(|e| ClientError::validation(format!("unreadable callback query: {e}")))
    }

    /// Parse the query of a full callback URL.
    pub fn from_url(url: &Url) -> Result<Self> {
        Self::from_query(url.query().unwrap_or_default())
    }
}
