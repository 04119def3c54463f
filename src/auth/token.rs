use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

const BEARER: &str = "Bearer";

/// The bearer/refresh token pair currently used by a session.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: Option<u64>,
    pub scope: Option<String>,
    /// When the pair was received, used to derive its expiry.
    #[serde(default)]
    pub obtained_at_unix: Option<u64>,
}

impl TokenPair {
    const EXPIRY_SKEW_SECS: u64 = 30;

    /// Wraps tokens obtained out of band; their lifetime is unknown.
    pub fn from_existing(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            token_type: BEARER.to_string(),
            expires_in: None,
            scope: None,
            obtained_at_unix: None,
        }
    }

    pub fn expires_at_unix(&self) -> Option<u64> {
        Some(self.obtained_at_unix?.saturating_add(self.expires_in?))
    }

    pub fn is_expired(&self, now: SystemTime) -> bool {
        let Some(expires_at) = self.expires_at_unix() else {
            return false;
        };

        let Ok(duration) = now.duration_since(UNIX_EPOCH) else {
            return false;
        };

        duration.as_secs().saturating_add(Self::EXPIRY_SKEW_SECS) >= expires_at
    }

    pub fn expires_in_seconds(&self, now: SystemTime) -> Option<i64> {
        let expires_at = self.expires_at_unix()? as i64;
        let now_secs = now.duration_since(UNIX_EPOCH).ok()?.as_secs() as i64;
        Some(expires_at - now_secs)
    }
}

impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

/// Body of a successful `POST /auth/oauth2/token`.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    token_type: String,
    access_token: String,
    refresh_token: String,
    expires_in: u64,
    #[serde(default)]
    scope: Option<String>,
}

impl TokenResponse {
    pub(crate) fn into_pair(self, now: SystemTime) -> TokenPair {
        TokenPair {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            token_type: self.token_type,
            expires_in: Some(self.expires_in),
            scope: self.scope,
            obtained_at_unix: now
                .duration_since(UNIX_EPOCH)
                .ok()
                .map(|duration| duration.as_secs()),
        }
    }
}
