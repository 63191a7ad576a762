//! Authenticated Graph API reads layered on an [`AuthClient`].

use std::ops::Deref;

use fbgraph_common::{
    error::{Result, TransportError},
    http_client::HttpClient,
};
use fbgraph_oauth::{
    client::AuthClient,
    config::GRAPH_BASE,
    request::{decode_json, encode_query, get, into_success_body},
};
use serde::{Serialize, de::DeserializeOwned};
use smol_str::SmolStr;
use url::Url;

use crate::types::{PictureInfo, PictureSize, UserInfo};

/// Wraps an [`AuthClient`] and reads on behalf of its session's user.
///
/// Lookups go to `/me` until the user id is known (from introspection or a
/// previous profile read), and to `/{user_id}` afterwards.
pub struct GraphAgent<T> {
    inner: AuthClient<T>,
}

impl<T> From<AuthClient<T>> for GraphAgent<T> {
    fn from(inner: AuthClient<T>) -> Self {
        Self { inner }
    }
}

impl<T> Deref for GraphAgent<T> {
    type Target = AuthClient<T>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T> GraphAgent<T> {
    pub fn new(inner: AuthClient<T>) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> AuthClient<T> {
        self.inner
    }
}

#[derive(Serialize)]
struct UserQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<String>,
    access_token: &'a str,
}

#[derive(Serialize)]
struct PictureQuery<'a> {
    redirect: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    width: Option<u32>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    size: Option<PictureSize>,
    access_token: &'a str,
}

impl<T> GraphAgent<T>
where
    T: HttpClient + Sync,
{
    /// Profile of the session's user, with the provider's default fields.
    pub async fn user(&self) -> Result<UserInfo> {
        self.user_with_fields(&[]).await
    }

    /// Profile of the session's user, asking for specific `fields`.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip(self)))]
    pub async fn user_with_fields(&self, fields: &[&str]) -> Result<UserInfo> {
        let (token, node) = self.subject().await?;
        let query = UserQuery {
            fields: (!fields.is_empty()).then(|| fields.join(",")),
            access_token: &token,
        };
        let user: UserInfo = self.read("user", &node, None, &query).await?;
        if !user.id.is_empty() {
            self.inner.set_user_id(&token, user.id.clone()).await;
        }
        Ok(user)
    }

    /// Current profile picture.
    ///
    /// `height` and `width` are left out when zero. `size` must be empty or
    /// one of `square`, `small`, `normal`, `large`; anything else is rejected
    /// before a request is made.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip(self)))]
    pub async fn picture(&self, height: u32, width: u32, size: &str) -> Result<PictureInfo> {
        let size = match size {
            "" => None,
            other => Some(other.parse::<PictureSize>()?),
        };
        let (token, node) = self.subject().await?;
        let query = PictureQuery {
            redirect: false,
            height: (height != 0).then_some(height),
            width: (width != 0).then_some(width),
            size,
            access_token: &token,
        };
        self.read("picture", &node, Some("picture"), &query).await
    }

    /// Token and node (`me` or the user id) for the current session.
    async fn subject(&self) -> Result<(SmolStr, SmolStr)> {
        let token = self.inner.access_token().await?;
        let node = self
            .inner
            .session()
            .await
            .and_then(|s| s.user_id)
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| SmolStr::new_static("me"));
        Ok((token, node))
    }

    async fn read<Q, O>(&self, name: &str, node: &str, edge: Option<&str>, query: &Q) -> Result<O>
    where
        Q: Serialize,
        O: DeserializeOwned,
    {
        let endpoint = node_url(node, edge)?;
        let query = encode_query(query)?;
        let response = get(
            self.inner.http_client(),
            self.inner.options(),
            name,
            &endpoint,
            &query,
        )
        .await?;
        decode_json(&into_success_body(response)?)
    }
}

fn node_url(node: &str, edge: Option<&str>) -> Result<String> {
    let mut url = Url::parse(GRAPH_BASE).map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| TransportError::InvalidRequest("graph base URL cannot take a path".into()))?
        .pop_if_empty()
        .push(node)
        .extend(edge);
    Ok(url.into())
}
