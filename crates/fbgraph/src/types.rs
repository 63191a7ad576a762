//! Graph API response records.

use std::str::FromStr;

use fbgraph_common::error::ClientError;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Profile record from the user node.
// https://developers.facebook.com/docs/graph-api/reference/user
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct UserInfo {
    pub id: SmolStr,
    pub name: Option<SmolStr>,
    pub first_name: Option<SmolStr>,
    pub middle_name: Option<SmolStr>,
    pub last_name: Option<SmolStr>,
    pub name_format: Option<SmolStr>,
    pub email: Option<SmolStr>,
    pub gender: Option<SmolStr>,
    pub bio: Option<SmolStr>,
    pub link: Option<SmolStr>,
    pub locale: Option<SmolStr>,
    pub political: Option<SmolStr>,
    pub quotes: Option<SmolStr>,
    pub relationship_status: Option<SmolStr>,
    pub religion: Option<SmolStr>,
    pub third_party_id: Option<SmolStr>,
    pub username: Option<SmolStr>,
    pub website: Option<SmolStr>,
    #[serde(default)]
    pub installed: bool,
    /// Manually verified public figure.
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub verified: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PictureInfo {
    pub data: PictureData,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PictureData {
    pub url: SmolStr,
    pub is_silhouette: bool,
    pub height: Option<u32>,
    pub width: Option<u32>,
}

/// Preset sizes accepted by the picture edge's `type` parameter.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PictureSize {
    Square,
    Small,
    Normal,
    Large,
}

impl PictureSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::Small => "small",
            Self::Normal => "normal",
            Self::Large => "large",
        }
    }
}

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
#[error("unknown picture size {0:?}")]
#[diagnostic(
    code(fbgraph::picture_size),
    help("use one of: square, small, normal, large")
)]
pub struct InvalidPictureSize(pub SmolStr);

impl From<InvalidPictureSize> for ClientError {
    fn from(err: InvalidPictureSize) -> Self {
        ClientError::validation(err.to_string())
    }
}

impl FromStr for PictureSize {
    type Err = InvalidPictureSize;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "square" => Ok(Self::Square),
            "small" => Ok(Self::Small),
            "normal" => Ok(Self::Normal),
            "large" => Ok(Self::Large),
            other => Err(InvalidPictureSize(other.into())),
        }
    }
}

impl std::fmt::Display for PictureSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picture_sizes() {
        for size in ["square", "small", "normal", "large"] {
            assert_eq!(size.parse::<PictureSize>().unwrap().as_str(), size);
        }
        for bad in ["huge", "Square", "", " small"] {
            assert!(bad.parse::<PictureSize>().is_err(), "{bad:?}");
        }
        let err: ClientError = "huge".parse::<PictureSize>().unwrap_err().into();
        assert!(matches!(err, ClientError::Validation(_)));
    }

    #[test]
    fn sparse_profile_decodes() {
        let user: UserInfo = serde_json::from_str(r#"{"id":"222","name":"Ada Lovelace"}"#).unwrap();
        assert_eq!(user.id, "222");
        assert_eq!(user.name.as_deref(), Some("Ada Lovelace"));
        assert!(user.email.is_none());
        assert!(!user.verified);
    }

    #[test]
    fn profile_without_id_is_rejected() {
        assert!(serde_json::from_str::<UserInfo>(r#"{"name":"nobody"}"#).is_err());
    }
}
