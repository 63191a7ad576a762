use std::time::Duration;

use fbgraph_common::error::{ClientError, ConfigError, Result};
use secrecy::{ExposeSecret, SecretString};
use smol_str::SmolStr;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Login dialog the user-agent is redirected to.
pub const AUTHORIZATION_ENDPOINT: &str = "https://www.facebook.com/dialog/oauth";
/// Code-for-token exchange.
pub const TOKEN_ENDPOINT: &str = "https://graph.facebook.com/oauth/access_token";
/// Token introspection (`debug_token`).
pub const INTROSPECTION_ENDPOINT: &str = "https://graph.facebook.com/debug_token";
/// Root of the Graph API; profile reads append to this.
pub const GRAPH_BASE: &str = "https://graph.facebook.com";

/// Upper bound on a single request when the caller sets none.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Static app registration data. Immutable once built.
#[derive(Debug)]
pub struct ClientConfig {
    app_id: SmolStr,
    app_secret: SecretString,
    callback: SmolStr,
    callback_url: Url,
    scope: Vec<SmolStr>,
}

impl ClientConfig {
    /// Validate and assemble the configuration.
    ///
    /// `callback_url` has to be the absolute redirect URL registered with the
    /// app; it is sent to the provider exactly as given. Scope entries are
    /// passed through unchecked and keep their order.
    pub fn new<S>(
        app_id: impl Into<SmolStr>,
        app_secret: impl Into<String>,
        callback_url: &str,
        scope: impl IntoIterator<Item = S>,
    ) -> Result<Self>
    where
        S: Into<SmolStr>,
    {
        let app_id = app_id.into();
        if app_id.is_empty() {
            return Err(ConfigError::EmptyAppId.into());
        }
        let parsed = Url::parse(callback_url).map_err(|source| ConfigError::InvalidCallbackUrl {
            url: callback_url.into(),
            source,
        })?;
        if !parsed.has_host() {
            return Err(ClientError::from(ConfigError::CallbackUrlWithoutHost(
                callback_url.into(),
            )));
        }
        Ok(Self {
            app_id,
            app_secret: SecretString::new(app_secret.into()),
            callback: callback_url.into(),
            callback_url: parsed,
            scope: scope.into_iter().map(Into::into).collect(),
        })
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Redirect URI exactly as configured.
    pub fn redirect_uri(&self) -> &str {
        &self.callback
    }

    pub fn callback_url(&self) -> &Url {
        &self.callback_url
    }

    pub fn scope(&self) -> &[SmolStr] {
        &self.scope
    }

    /// Scope in the provider's wire form: comma separated, original order.
    pub fn scope_param(&self) -> String {
        self.scope.join(",")
    }

    pub(crate) fn app_secret(&self) -> &str {
        self.app_secret.expose_secret()
    }

    /// App-level credential (`<app id>|<app secret>`) used for introspection.
    pub(crate) fn app_access_token(&self) -> String {
        format!("{}|{}", self.app_id, self.app_secret.expose_secret())
    }
}

/// Per-client request behaviour.
#[derive(Debug, Clone, bon::Builder)]
pub struct ClientOptions {
    /// Bound on each network call, covering connect, send and body read.
    #[builder(default = DEFAULT_TIMEOUT)]
    pub timeout: Duration,
    /// Cancelled when the surrounding request goes away (e.g. the browser
    /// disconnected); in-flight calls then fail with `Cancelled`.
    pub cancel: Option<CancellationToken>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_relative_callback() {
        let err = ClientConfig::new("1", "s", "/auth/callback", ["email"]).unwrap_err();
        assert!(matches!(
            err,
            ClientError::Configuration(ConfigError::InvalidCallbackUrl { .. })
        ));
    }

    #[test]
    fn rejects_hostless_callback() {
        let err = ClientConfig::new("1", "s", "mailto:someone@example.com", ["email"]).unwrap_err();
        assert!(matches!(
            err,
            ClientError::Configuration(ConfigError::CallbackUrlWithoutHost(_))
        ));
    }

    #[test]
    fn rejects_empty_app_id() {
        let err =
            ClientConfig::new("", "s", "https://example.com/cb", Vec::<SmolStr>::new()).unwrap_err();
        assert!(matches!(err, ClientError::Configuration(ConfigError::EmptyAppId)));
    }

    #[test]
    fn debug_output_hides_secret() {
        let config =
            ClientConfig::new("123", "hunter2", "https://example.com/cb", ["email"]).unwrap();
        let shown = format!("{config:?}");
        assert!(!shown.contains("hunter2"), "{shown}");
        assert!(shown.contains("123"));
    }

    #[test]
    fn scope_keeps_order() {
        let config = ClientConfig::new(
            "123",
            "s",
            "https://example.com/cb",
            ["public_profile", "email", "user_birthday"],
        )
        .unwrap();
        assert_eq!(config.scope_param(), "public_profile,email,user_birthday");
        assert_eq!(config.app_access_token(), "123|s");
    }

    #[test]
    fn default_options() {
        let opts = ClientOptions::default();
        assert_eq!(opts.timeout, DEFAULT_TIMEOUT);
        assert!(opts.cancel.is_none());
    }
}
