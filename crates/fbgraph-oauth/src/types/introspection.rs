use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use smol_str::{SmolStr, ToSmolStr};

#[derive(Deserialize)]
pub(crate) struct IntrospectionEnvelope {
    pub data: IntrospectionResult,
}

/// Provider's view of a token at the time of the call.
///
/// `expires_at` comes from the provider and can legitimately differ from the
/// locally computed [`SessionToken::expires_at`](crate::session::SessionToken).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct IntrospectionResult {
    /// App the token was issued for.
    #[serde(deserialize_with = "id_string")]
    pub app_id: SmolStr,
    pub application: SmolStr,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,
    pub is_valid: bool,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub issued_at: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub data_access_expires_at: Option<DateTime<Utc>>,
    /// `USER`, `PAGE`, `APP`, ...
    #[serde(default, rename = "type")]
    pub token_kind: Option<SmolStr>,
    #[serde(default)]
    pub scopes: Vec<SmolStr>,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub user_id: Option<SmolStr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<IntrospectionError>,
}

impl IntrospectionResult {
    /// The provider reports `expires_at = 0` for tokens without expiry.
    pub fn never_expires(&self) -> bool {
        self.expires_at.timestamp() == 0
    }

    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.iter().any(|s| s == scope)
    }
}

/// Reason attached to an invalid token.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct IntrospectionError {
    pub code: i64,
    pub message: SmolStr,
    #[serde(default)]
    pub subcode: Option<i64>,
}

// Graph ids show up as both JSON numbers and strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum GraphId {
    Num(u64),
    Str(SmolStr),
}

impl From<GraphId> for SmolStr {
    fn from(id: GraphId) -> Self {
        match id {
            GraphId::Num(n) => n.to_smolstr(),
            GraphId::Str(s) => s,
        }
    }
}

fn id_string<'de, D>(deserializer: D) -> Result<SmolStr, D::Error>
where
    D: Deserializer<'de>,
{
    GraphId::deserialize(deserializer).map(SmolStr::from)
}

fn opt_id_string<'de, D>(deserializer: D) -> Result<Option<SmolStr>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<GraphId>::deserialize(deserializer)?.map(SmolStr::from))
}
