//! Error types for Graph client operations

use serde::Deserialize;
use smol_str::SmolStr;

/// Client error type wrapping all possible error conditions
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ClientError {
    /// The client was constructed with unusable configuration
    #[error("invalid configuration: {0}")]
    #[diagnostic(code(fbgraph::configuration))]
    Configuration(
        #[from]
        #[diagnostic_source]
        ConfigError,
    ),

    /// A caller-supplied argument failed a precondition; no request was sent
    #[error("invalid argument: {0}")]
    #[diagnostic(code(fbgraph::validation))]
    Validation(SmolStr),

    /// HTTP transport error
    #[error("network error: {0}")]
    #[diagnostic(code(fbgraph::network))]
    Network(
        #[from]
        #[diagnostic_source]
        TransportError,
    ),

    /// Response could not be decoded into the expected shape
    #[error("malformed response: {0}")]
    #[diagnostic(code(fbgraph::malformed_response))]
    MalformedResponse(
        #[from]
        #[diagnostic_source]
        DecodeError,
    ),

    /// The provider answered with a well-formed error
    #[error("provider error: {0}")]
    #[diagnostic(code(fbgraph::provider))]
    Provider(
        #[from]
        #[diagnostic_source]
        ProviderError,
    ),
}

impl ClientError {
    /// Create a validation error
    pub fn validation(msg: impl Into<SmolStr>) -> Self {
        Self::Validation(msg.into())
    }

    /// Whether this error was raised before any request went out
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::Validation(_))
    }
}

/// Problems with the values a client was built from
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ConfigError {
    /// Callback URL did not parse as an absolute URL
    #[error("callback URL {url:?} is not a valid absolute URL")]
    #[diagnostic(
        code(fbgraph::config::callback_url),
        help("use the full redirect URL registered for the app, e.g. https://example.com/auth/callback")
    )]
    InvalidCallbackUrl {
        /// The rejected input
        url: SmolStr,
        /// Parser error
        #[source]
        source: url::ParseError,
    },

    /// Callback URL parsed but has no host to redirect to
    #[error("callback URL {0:?} has no host")]
    #[diagnostic(
        code(fbgraph::config::callback_host),
        help("the provider can only redirect to http(s) URLs with a host")
    )]
    CallbackUrlWithoutHost(SmolStr),

    /// App identifier was empty
    #[error("app id is empty")]
    #[diagnostic(code(fbgraph::config::app_id))]
    EmptyAppId,
}

/// Transport-level errors that occur during HTTP communication
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum TransportError {
    /// Failed to establish connection to server
    #[error("Connection error: {0}")]
    Connect(String),

    /// Request timed out
    #[error("Request timeout")]
    Timeout,

    /// The surrounding operation was cancelled before the response arrived
    #[error("Request cancelled")]
    Cancelled,

    /// Request construction failed (malformed URI, headers, etc.)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Other transport error
    #[error("Transport error: {0}")]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl TransportError {
    /// Classify an arbitrary [`HttpClient`](crate::HttpClient) error.
    ///
    /// reqwest errors keep their timeout/connect distinction, everything else
    /// lands in [`TransportError::Other`].
    pub fn from_client_error<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let boxed: Box<dyn std::error::Error + Send + Sync> = Box::new(err);
        #[cfg(feature = "reqwest-client")]
        let boxed = match boxed.downcast::<reqwest::Error>() {
            Ok(e) => return Self::from(*e),
            Err(other) => other,
        };
        Self::Other(boxed)
    }
}

#[cfg(feature = "reqwest-client")]
impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::Connect(e.to_string())
        } else if e.is_builder() || e.is_request() {
            Self::InvalidRequest(e.to_string())
        } else {
            Self::Other(Box::new(e))
        }
    }
}

impl From<http::Error> for TransportError {
    fn from(e: http::Error) -> Self {
        Self::InvalidRequest(e.to_string())
    }
}

/// Response deserialization errors
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum DecodeError {
    /// JSON deserialization failed
    #[error("Failed to deserialize JSON: {0}")]
    Json(
        #[from]
        #[source]
        serde_json::Error,
    ),
    /// URL-encoded body deserialization failed
    #[error("Failed to deserialize form body: {0}")]
    Form(
        #[from]
        #[source]
        serde_html_form::de::Error,
    ),
    /// A field decoded but its value is unusable
    #[error("invalid `{field}`: {reason}")]
    InvalidField {
        /// Field name as sent by the provider
        field: &'static str,
        /// What was wrong with it
        reason: SmolStr,
    },
}

/// Error reported by the provider, either as a Graph error object or as an
/// error redirect on the login callback.
#[derive(Debug, Clone, thiserror::Error, miette::Diagnostic)]
pub struct ProviderError {
    /// HTTP status, absent for callback redirects
    pub status: Option<http::StatusCode>,
    /// `error.type`, or the callback `error` parameter
    pub kind: Option<SmolStr>,
    /// Human readable description
    pub message: Option<SmolStr>,
    /// `error.code`
    pub code: Option<i64>,
    /// `error.error_subcode`
    pub subcode: Option<i64>,
    /// `error.fbtrace_id`, useful when reporting problems upstream
    pub trace_id: Option<SmolStr>,
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "HTTP {status}")?,
            None => f.write_str("login callback")?,
        }
        if let Some(kind) = &self.kind {
            write!(f, " {kind}")?;
        }
        if let Some(code) = self.code {
            write!(f, " (code {code}")?;
            if let Some(subcode) = self.subcode {
                write!(f, ", subcode {subcode}")?;
            }
            f.write_str(")")?;
        }
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct GraphErrorEnvelope {
    error: GraphErrorBody,
}

#[derive(Deserialize)]
struct GraphErrorBody {
    message: Option<SmolStr>,
    #[serde(rename = "type")]
    kind: Option<SmolStr>,
    code: Option<i64>,
    error_subcode: Option<i64>,
    fbtrace_id: Option<SmolStr>,
}

impl ProviderError {
    /// Inspect a response for a provider error.
    ///
    /// Returns `Some` when the body carries a Graph `{"error": {..}}` object
    /// (whatever the status) or when the status is not a success.
    pub fn from_response(status: http::StatusCode, body: &[u8]) -> Option<Self> {
        if let Ok(GraphErrorEnvelope { error }) = serde_json::from_slice(body) {
            return Some(Self {
                status: Some(status),
                kind: error.kind,
                message: error.message,
                code: error.code,
                subcode: error.error_subcode,
                trace_id: error.fbtrace_id,
            });
        }
        if status.is_success() {
            return None;
        }
        Some(Self {
            status: Some(status),
            kind: None,
            message: std::str::from_utf8(body)
                .ok()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(SmolStr::from),
            code: None,
            subcode: None,
            trace_id: None,
        })
    }

    /// Error redirect from the authorization dialog (e.g. the user declined).
    pub fn callback(
        error: impl Into<SmolStr>,
        reason: Option<SmolStr>,
        description: Option<SmolStr>,
    ) -> Self {
        Self {
            status: None,
            kind: Some(error.into()),
            message: description.or(reason),
            code: None,
            subcode: None,
            trace_id: None,
        }
    }
}

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn graph_error_body_is_provider_error() {
        let body = br#"{"error":{"message":"This authorization code has been used.","type":"OAuthException","code":100,"error_subcode":36009,"fbtrace_id":"AbC"}}"#;
        let err = ProviderError::from_response(StatusCode::BAD_REQUEST, body).unwrap();
        assert_eq!(err.kind.as_deref(), Some("OAuthException"));
        assert_eq!(err.code, Some(100));
        assert_eq!(err.subcode, Some(36009));
        assert_eq!(err.trace_id.as_deref(), Some("AbC"));
        let shown = err.to_string();
        assert!(shown.contains("OAuthException"), "{shown}");
        assert!(shown.contains("has been used"), "{shown}");
    }

    #[test]
    fn error_object_wins_over_success_status() {
        let body = br#"{"error":{"message":"bad","type":"GraphMethodException","code":803}}"#;
        assert!(ProviderError::from_response(StatusCode::OK, body).is_some());
    }

    #[test]
    fn plain_success_body_is_not_an_error() {
        assert!(ProviderError::from_response(StatusCode::OK, b"access_token=a&expires=1").is_none());
    }

    #[test]
    fn non_json_failure_keeps_status_and_text() {
        let err = ProviderError::from_response(StatusCode::BAD_GATEWAY, b" upstream down ").unwrap();
        assert_eq!(err.status, Some(StatusCode::BAD_GATEWAY));
        assert_eq!(err.message.as_deref(), Some("upstream down"));
    }

    #[derive(Debug, thiserror::Error)]
    #[error("boom")]
    struct Boom;

    #[test]
    fn foreign_client_errors_are_other() {
        assert!(matches!(
            TransportError::from_client_error(Boom),
            TransportError::Other(_)
        ));
    }
}
