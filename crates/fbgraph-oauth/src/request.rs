use chrono::{TimeDelta, Utc};
use fbgraph_common::{
    error::{ClientError, DecodeError, ProviderError, Result, TransportError},
    http_client::HttpClient,
};
use http::{Method, Request, Response};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    config::{
        AUTHORIZATION_ENDPOINT, ClientConfig, ClientOptions, INTROSPECTION_ENDPOINT,
        TOKEN_ENDPOINT,
    },
    session::SessionToken,
    types::{
        AuthorizationParameters, AuthorizationResponseType, IntrospectionEnvelope,
        IntrospectionParameters, IntrospectionResult, OAuthTokenResponse, TokenRequestParameters,
    },
};

pub enum OAuthRequest<'a> {
    Token(TokenRequestParameters<'a>),
    Introspection(IntrospectionParameters<'a>),
}

impl OAuthRequest<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Token(_) => "token",
            Self::Introspection(_) => "introspection",
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Token(_) => TOKEN_ENDPOINT,
            Self::Introspection(_) => INTROSPECTION_ENDPOINT,
        }
    }

    fn query(&self) -> Result<String> {
        match self {
            Self::Token(params) => encode_query(params),
            Self::Introspection(params) => encode_query(params),
        }
    }
}

/// Login dialog URL for this config. Parameters are assembled fresh on every
/// call; `state` is left out when empty.
pub fn authorization_url(config: &ClientConfig, state: Option<&str>) -> String {
    let scope = config.scope_param();
    let params = AuthorizationParameters {
        client_id: config.app_id(),
        redirect_uri: config.redirect_uri(),
        scope: &scope,
        response_type: AuthorizationResponseType::Code,
        state,
    };
    format!("{AUTHORIZATION_ENDPOINT}?{}", params.to_query())
}

#[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip_all))]
pub async fn exchange_code<T>(
    client: &T,
    options: &ClientOptions,
    config: &ClientConfig,
    code: &str,
) -> Result<SessionToken>
where
    T: HttpClient + Sync,
{
    if code.is_empty() {
        return Err(ClientError::validation("authorization code is empty"));
    }
    let body = oauth_request(
        client,
        options,
        OAuthRequest::Token(TokenRequestParameters {
            client_id: config.app_id(),
            redirect_uri: config.redirect_uri(),
            client_secret: config.app_secret(),
            code,
        }),
    )
    .await?;
    let received = Utc::now();
    let token = decode_token_response(&body)?;
    if token.access_token.is_empty() {
        return Err(DecodeError::InvalidField {
            field: "access_token",
            reason: "empty".into(),
        }
        .into());
    }
    let lifetime = i64::try_from(token.expires)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .ok_or_else(|| DecodeError::InvalidField {
            field: "expires",
            reason: smol_str::format_smolstr!("lifetime of {}s is out of range", token.expires),
        })?;
    let mut session = SessionToken::new(token.access_token, received, lifetime).ok_or_else(|| {
        DecodeError::InvalidField {
            field: "expires",
            reason: "expiry instant is out of range".into(),
        }
    })?;
    session.token_type = token.token_type;
    Ok(session)
}

#[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip_all))]
pub async fn introspect<T>(
    client: &T,
    options: &ClientOptions,
    config: &ClientConfig,
    token: &str,
) -> Result<IntrospectionResult>
where
    T: HttpClient + Sync,
{
    if token.is_empty() {
        return Err(ClientError::validation("token to introspect is empty"));
    }
    let app_token = config.app_access_token();
    let body = oauth_request(
        client,
        options,
        OAuthRequest::Introspection(IntrospectionParameters {
            input_token: token,
            access_token: &app_token,
        }),
    )
    .await?;
    let IntrospectionEnvelope { data } = decode_json(&body)?;
    Ok(data)
}

pub async fn oauth_request<T>(
    client: &T,
    options: &ClientOptions,
    request: OAuthRequest<'_>,
) -> Result<Vec<u8>>
where
    T: HttpClient + Sync,
{
    let query = request.query()?;
    let response = get(client, options, request.name(), request.endpoint(), &query).await?;
    into_success_body(response)
}

/// Issue a GET to `endpoint?query`, bounded by the configured timeout and
/// cancellation token.
///
/// `name` is what gets logged; the URL itself carries credentials and is not.
pub async fn get<T>(
    client: &T,
    options: &ClientOptions,
    name: &str,
    endpoint: &str,
    query: &str,
) -> Result<Response<Vec<u8>>>
where
    T: HttpClient + Sync,
{
    let uri = if query.is_empty() {
        endpoint.to_owned()
    } else {
        format!("{endpoint}?{query}")
    };
    let req = Request::builder()
        .uri(uri)
        .method(Method::GET)
        .header(http::header::ACCEPT, "application/json")
        .body(Vec::new())
        .map_err(TransportError::from)?;

    let call = tokio::time::timeout(options.timeout, client.send_http(req));
    let outcome = match &options.cancel {
        Some(cancel) => tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                #[cfg(feature = "tracing")]
                tracing::debug!(endpoint = name, "request cancelled");
                return Err(TransportError::Cancelled.into());
            }
            outcome = call => outcome,
        },
        None => call.await,
    };
    let response = match outcome {
        Ok(Ok(response)) => response,
        Ok(Err(e)) => {
            #[cfg(feature = "tracing")]
            tracing::debug!(endpoint = name, error = %e, "transport failure");
            return Err(TransportError::from_client_error(e).into());
        }
        Err(_elapsed) => {
            #[cfg(feature = "tracing")]
            tracing::debug!(endpoint = name, timeout = ?options.timeout, "request timed out");
            return Err(TransportError::Timeout.into());
        }
    };
    #[cfg(feature = "tracing")]
    tracing::debug!(endpoint = name, status = %response.status(), "response received");
    #[cfg(not(feature = "tracing"))]
    let _ = name;
    Ok(response)
}

/// Body of a successful response, or the provider error it carries.
pub fn into_success_body(response: Response<Vec<u8>>) -> Result<Vec<u8>> {
    let (parts, body) = response.into_parts();
    match ProviderError::from_response(parts.status, &body) {
        Some(err) => Err(err.into()),
        None => Ok(body),
    }
}

pub fn decode_json<O: DeserializeOwned>(body: &[u8]) -> Result<O> {
    Ok(serde_json::from_slice(body).map_err(DecodeError::from)?)
}

/// Token bodies are URL-encoded, except on API versions that switched to JSON.
pub fn decode_token_response(body: &[u8]) -> Result<OAuthTokenResponse> {
    let json = body
        .iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|b| *b == b'{');
    if json {
        decode_json(body)
    } else {
        Ok(serde_html_form::from_bytes(body).map_err(DecodeError::from)?)
    }
}

pub fn encode_query<S: Serialize>(params: &S) -> Result<String> {
    serde_html_form::to_string(params)
        .map_err(|e| TransportError::InvalidRequest(e.to_string()).into())
}
