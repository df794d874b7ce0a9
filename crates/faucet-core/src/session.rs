//! Tokens obtained from a successful authorization code exchange.

use serde::{Deserialize, Serialize};

/// Access and refresh tokens for one browser session.
///
/// Held in memory only. A session gets its tokens from the OAuth exchange and
/// loses them on logout or when the process exits.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTokens {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

impl SessionTokens {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            scope: None,
        }
    }

    /// Value of the `Authorization` header for backend calls.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

// Keep tokens out of logs.
impl std::fmt::Debug for SessionTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokens")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("scope", &self.scope)
            .finish()
    }
}
