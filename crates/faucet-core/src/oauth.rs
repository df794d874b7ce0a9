//! OAuth callback parsing and the authorization code exchange.

use crate::error::{ClientResult, FaucetClientError};
use crate::session::SessionTokens;
use reqwest::Client;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info};

/// Code verifier sent with the exchange when none is configured.
pub const DEFAULT_CODE_VERIFIER: &str = "challenge";

/// Parameters the provider appends to the redirect back to us.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackParams {
    /// OAuth 2.0 authorization code flow.
    AuthorizationCode { code: String, state: String },
    /// Legacy OAuth 1.0a request token flow.
    RequestToken {
        oauth_token: String,
        oauth_verifier: String,
    },
    /// Neither parameter pair is complete.
    Missing,
}

impl CallbackParams {
    /// Classify a decoded query string. Empty values count as absent.
    pub fn from_query_map(query: &HashMap<String, String>) -> Self {
        let get = |key: &str| query.get(key).filter(|v| !v.is_empty()).cloned();

        if let (Some(code), Some(state)) = (get("code"), get("state")) {
            return Self::AuthorizationCode { code, state };
        }
        if let (Some(oauth_token), Some(oauth_verifier)) = (get("oauth_token"), get("oauth_verifier")) {
            return Self::RequestToken {
                oauth_token,
                oauth_verifier,
            };
        }
        Self::Missing
    }

    /// Parse a raw query string such as `code=abc&state=xyz`.
    pub fn from_query(query: &str) -> Self {
        let map: HashMap<String, String> = url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
            .into_owned()
            .collect();
        Self::from_query_map(&map)
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

/// Client credentials and endpoint for the code exchange.
#[derive(Clone)]
pub struct OAuthSettings {
    pub token_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub code_verifier: String,
}

impl std::fmt::Debug for OAuthSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthSettings")
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .field("code_verifier", &self.code_verifier)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct TokenExchangeRequest<'a> {
    code: &'a str,
    grant_type: &'static str,
    client_id: &'a str,
    redirect_uri: &'a str,
    code_verifier: &'a str,
}

/// Performs the provider-to-server code exchange.
///
/// The client secret is only ever sent from here, never rendered to a page.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    http_client: Client,
    settings: OAuthSettings,
}

impl OAuthClient {
    pub fn new(settings: OAuthSettings, timeout: Duration) -> ClientResult<Self> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            settings,
        })
    }

    pub fn settings(&self) -> &OAuthSettings {
        &self.settings
    }

    /// Exchange an authorization code for session tokens.
    pub async fn exchange_code(&self, code: &str) -> ClientResult<SessionTokens> {
        let request = TokenExchangeRequest {
            code,
            grant_type: "authorization_code",
            client_id: &self.settings.client_id,
            redirect_uri: &self.settings.redirect_uri,
            code_verifier: &self.settings.code_verifier,
        };

        debug!("Exchanging authorization code at {}", self.settings.token_url);

        let response = self
            .http_client
            .post(&self.settings.token_url)
            .basic_auth(&self.settings.client_id, Some(&self.settings.client_secret))
            .form(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let headers = response.headers().clone();
            let body = response.text().await.unwrap_or_default();
            return Err(FaucetClientError::Status {
                endpoint: self.settings.token_url.clone(),
                status,
                headers,
                body,
            });
        }

        let tokens: SessionTokens = response.json().await.map_err(|e| FaucetClientError::Decode {
            endpoint: self.settings.token_url.clone(),
            reason: e.to_string(),
        })?;

        info!(
            "Authorization code exchanged (refresh token: {}, scope: {:?})",
            tokens.refresh_token.is_some(),
            tokens.scope
        );
        Ok(tokens)
    }
}
