use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Access token obtained for one end user.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
    pub access_token: SmolStr,
    /// Local clock at exchange completion plus the provider-declared lifetime.
    pub expires_at: DateTime<Utc>,
    pub token_type: Option<SmolStr>,
    /// Platform user id, known once introspection or a profile read succeeded.
    pub user_id: Option<SmolStr>,
}

impl SessionToken {
    /// Build a token that expires `lifetime` after `issued`.
    ///
    /// `None` if the instant does not fit the calendar.
    pub fn new(
        access_token: impl Into<SmolStr>,
        issued: DateTime<Utc>,
        lifetime: TimeDelta,
    ) -> Option<Self> {
        Some(Self {
            access_token: access_token.into(),
            expires_at: issued.checked_add_signed(lifetime)?,
            token_type: None,
            user_id: None,
        })
    }

    /// An empty access token counts as no session at all.
    pub fn is_authenticated(&self) -> bool {
        !self.access_token.is_empty()
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }

    /// Remaining lifetime, zero once expired.
    pub fn expires_in(&self) -> TimeDelta {
        (self.expires_at - Utc::now()).max(TimeDelta::zero())
    }
}
