use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationResponseType {
    Code,
}

impl AuthorizationResponseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Code => "code",
        }
    }
}

/// Query of the login dialog redirect.
#[derive(Debug)]
pub struct AuthorizationParameters<'a> {
    pub client_id: &'a str,
    pub redirect_uri: &'a str,
    pub scope: &'a str,
    pub response_type: AuthorizationResponseType,
    pub state: Option<&'a str>,
}

impl AuthorizationParameters<'_> {
    /// Form-encoded query, in the order the login dialog documents. An empty
    /// `state` is left out.
    pub fn to_query(&self) -> String {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        query
            .append_pair("client_id", self.client_id)
            .append_pair("redirect_uri", self.redirect_uri)
            .append_pair("scope", self.scope)
            .append_pair("response_type", self.response_type.as_str());
        if let Some(state) = self.state.filter(|s| !s.is_empty()) {
            query.append_pair("state", state);
        }
        query.finish()
    }
}

/// Query of the code-for-token exchange. `redirect_uri` must be the one the
/// authorization URL was built with.
#[derive(Serialize)]
pub struct TokenRequestParameters<'a> {
    pub client_id: &'a str,
    pub redirect_uri: &'a str,
    pub client_secret: &'a str,
    pub code: &'a str,
}

// https://developers.facebook.com/docs/facebook-login/guides/advanced/manual-flow#checktoken
#[derive(Serialize)]
pub struct IntrospectionParameters<'a> {
    pub input_token: &'a str,
    /// App credential, `<app id>|<app secret>`.
    pub access_token: &'a str,
}
