//! Client for the faucet backend service.

use crate::claim::ClaimRequest;
use crate::error::{ClientResult, FaucetClientError};
use crate::session::SessionTokens;
use reqwest::{header, Client, StatusCode};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Successful answer from the backend, kept for logging.
#[derive(Debug, Clone)]
pub struct BackendReply {
    pub status: StatusCode,
    pub body: String,
}

/// HTTP client bound to one backend base URL.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http_client: Client,
    base_url: Url,
}

impl BackendClient {
    pub fn new(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        let mut base_url = Url::parse(base_url)?;
        // Url::join drops the last path segment unless it ends with a slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> ClientResult<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Where the browser goes to start the OAuth dance.
    pub fn login_url(&self) -> ClientResult<Url> {
        self.endpoint("login/twitter")
    }

    /// Hand a fresh access token to the backend so it can register the user.
    pub async fn establish_session(&self, tokens: &SessionTokens) -> ClientResult<BackendReply> {
        let mut url = self.endpoint("auth/twitter/")?;
        url.query_pairs_mut()
            .append_pair("access_token", &tokens.access_token);

        debug!("Establishing backend session at {}", url.path());

        let response = self.http_client.get(url.clone()).send().await?;
        self.read_reply(url, response).await
    }

    /// Post a claim to `/faucet` on behalf of the session owner.
    pub async fn submit_claim(
        &self,
        tokens: &SessionTokens,
        claim: &ClaimRequest,
    ) -> ClientResult<BackendReply> {
        let url = self.endpoint("faucet")?;

        info!(
            "Claiming funds for chain: {}, address: {}",
            claim.chain, claim.address
        );

        let response = self
            .http_client
            .post(url.clone())
            .header(header::AUTHORIZATION, tokens.bearer())
            .json(&claim.to_payload())
            .send()
            .await?;

        self.read_reply(url, response).await
    }

    async fn read_reply(&self, url: Url, response: reqwest::Response) -> ClientResult<BackendReply> {
        let status = response.status();
        if !status.is_success() {
            let headers = response.headers().clone();
            let body = response.text().await.unwrap_or_default();
            return Err(FaucetClientError::Status {
                endpoint: url.path().to_string(),
                status,
                headers,
                body,
            });
        }

        let body = response.text().await?;
        Ok(BackendReply { status, body })
    }
}
