use std::sync::Arc;

use fbgraph_common::{
    error::{ClientError, ProviderError, Result},
    http_client::HttpClient,
};
use smol_str::SmolStr;
use tokio::sync::RwLock;

use crate::{
    config::{ClientConfig, ClientOptions},
    request::{self, authorization_url},
    session::SessionToken,
    types::{CallbackParams, IntrospectionResult},
};

/// OAuth client for a single end-user session.
///
/// Configuration is shared read-only; per-call state is built inside each
/// call, so one instance can be used from concurrent tasks. The stored session
/// is only replaced after an operation fully succeeds.
pub struct AuthClient<T> {
    config: Arc<ClientConfig>,
    options: ClientOptions,
    client: T,
    session: RwLock<Option<SessionToken>>,
}

impl AuthClient<reqwest::Client> {
    /// Validate the configuration and pair it with a default reqwest client.
    /// No network I/O happens here.
    pub fn new<S>(
        app_id: impl Into<SmolStr>,
        app_secret: impl Into<String>,
        callback_url: &str,
        scope: impl IntoIterator<Item = S>,
    ) -> Result<Self>
    where
        S: Into<SmolStr>,
    {
        let config = ClientConfig::new(app_id, app_secret, callback_url, scope)?;
        Ok(Self::with_http(config, reqwest::Client::new()))
    }
}

impl<T> AuthClient<T> {
    pub fn with_http(config: impl Into<Arc<ClientConfig>>, client: T) -> Self {
        Self::with_options(config, client, ClientOptions::default())
    }

    pub fn with_options(
        config: impl Into<Arc<ClientConfig>>,
        client: T,
        options: ClientOptions,
    ) -> Self {
        Self {
            config: config.into(),
            options,
            client,
            session: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub fn http_client(&self) -> &T {
        &self.client
    }

    /// Where to send the user-agent. Pass a fresh CSRF `state` (see
    /// [`generate_state`](crate::utils::generate_state)); empty means none.
    pub fn authorization_url(&self, state: Option<&str>) -> String {
        authorization_url(&self.config, state)
    }

    /// Copy of the current session, if any.
    pub async fn session(&self) -> Option<SessionToken> {
        self.session.read().await.clone()
    }

    /// Install a token obtained elsewhere (e.g. restored by the host app).
    /// An unauthenticated token clears the session instead.
    pub async fn set_session(&self, token: SessionToken) {
        let next = token.is_authenticated().then_some(token);
        *self.session.write().await = next;
    }

    pub async fn clear_session(&self) {
        *self.session.write().await = None;
    }

    /// Record the platform user id on the current session, unless the session
    /// was replaced by a different token in the meantime.
    pub async fn set_user_id(&self, access_token: &str, user_id: SmolStr) {
        let mut guard = self.session.write().await;
        if let Some(session) = guard.as_mut().filter(|s| s.access_token == access_token) {
            session.user_id = Some(user_id);
        }
    }

    /// Access token of the current session, or a validation error.
    pub async fn access_token(&self) -> Result<SmolStr> {
        self.session
            .read()
            .await
            .as_ref()
            .filter(|s| s.is_authenticated())
            .map(|s| s.access_token.clone())
            .ok_or_else(|| ClientError::validation("no authenticated session"))
    }
}

impl<T> AuthClient<T>
where
    T: HttpClient + Sync,
{
    /// Trade an authorization code for an access token and make it the
    /// current session. Codes are single use; failures are not retried.
    pub async fn exchange_code(&self, code: &str) -> Result<SessionToken> {
        let token = request::exchange_code(&self.client, &self.options, &self.config, code).await?;
        *self.session.write().await = Some(token.clone());
        #[cfg(feature = "tracing")]
        tracing::info!(expires_at = %token.expires_at, "access token obtained");
        Ok(token)
    }

    /// Handle the redirect back from the login dialog.
    ///
    /// `expected_state` is the value passed to
    /// [`authorization_url`](Self::authorization_url); when given, the
    /// callback must echo it.
    pub async fn callback(
        &self,
        params: CallbackParams,
        expected_state: Option<&str>,
    ) -> Result<SessionToken> {
        if let Some(error) = params.error {
            return Err(
                ProviderError::callback(error, params.error_reason, params.error_description)
                    .into(),
            );
        }
        if let Some(expected) = expected_state.filter(|s| !s.is_empty()) {
            if params.state.as_deref() != Some(expected) {
                return Err(ClientError::validation("callback state does not match"));
            }
        }
        let Some(code) = params.code else {
            return Err(ClientError::validation("callback is missing the `code` parameter"));
        };
        self.exchange_code(&code).await
    }

    /// Ask the provider about any token, using the app credential.
    pub async fn introspect(&self, token: &str) -> Result<IntrospectionResult> {
        request::introspect(&self.client, &self.options, &self.config, token).await
    }

    /// Introspect the current session's token and remember the user id it
    /// resolves to.
    pub async fn introspect_session(&self) -> Result<IntrospectionResult> {
        let token = self.access_token().await?;
        let info = self.introspect(&token).await?;
        if let Some(user_id) = &info.user_id {
            self.set_user_id(&token, user_id.clone()).await;
        }
        Ok(info)
    }
}

impl<T> std::fmt::Debug for AuthClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthClient")
            .field("config", &self.config)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
