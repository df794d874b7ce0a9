//! Configuration management for the faucet frontend.

use crate::http::PAGE_ROUTES;
use faucet_core::chain::{default_catalogue, ChainOption};
use faucet_core::oauth::{OAuthSettings, DEFAULT_CODE_VERIFIER};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Upper bound for session lifetimes and sweep intervals (one week)
pub const MAX_SESSION_MINUTES: u64 = 7 * 24 * 60;

/// Configuration for the faucet frontend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrontendConfig {
    /// HTTP server configuration
    pub http: HttpConfig,

    /// Faucet backend configuration
    pub backend: BackendConfig,

    /// OAuth provider configuration
    pub oauth: OAuthConfig,

    /// Claim form configuration
    pub claim: ClaimConfig,

    /// Session lifetime configuration
    #[serde(default)]
    pub session: SessionConfig,

    /// Development proxy towards the OAuth provider
    #[serde(default)]
    pub proxy: ProxyConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Port to bind to
    pub port: u16,

    /// Address to bind to
    pub bind_address: String,
}

/// Faucet backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the faucet backend
    pub base_url: String,

    /// Timeout for every outbound request, in seconds
    pub request_timeout_secs: u64,
}

/// OAuth provider configuration. Never rendered to a page.
#[derive(Clone, Serialize, Deserialize)]
pub struct OAuthConfig {
    pub token_url: String,
    pub client_id: String,
    pub client_secret: String,
    /// Must match the redirect URI registered with the provider
    pub redirect_uri: String,
    #[serde(default = "default_code_verifier")]
    pub code_verifier: String,
}

fn default_code_verifier() -> String {
    DEFAULT_CODE_VERIFIER.to_string()
}

impl std::fmt::Debug for OAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthConfig")
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .field("code_verifier", &self.code_verifier)
            .finish()
    }
}

impl From<&OAuthConfig> for OAuthSettings {
    fn from(config: &OAuthConfig) -> Self {
        OAuthSettings {
            token_url: config.token_url.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
            code_verifier: config.code_verifier.clone(),
        }
    }
}

/// Claim form configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimConfig {
    /// Initial state of the "only native token" checkbox. Has no serde
    /// default: every deployment states it explicitly.
    pub only_native_token_default: bool,

    /// Networks offered in the chain selector; the first one is preselected
    #[serde(default = "default_catalogue")]
    pub chains: Vec<ChainOption>,
}

/// Session lifetime configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Minutes a session keeps its tokens after login
    pub ttl_minutes: u64,

    /// Interval between sweeps of expired sessions, in minutes
    pub cleanup_interval_minutes: u64,

    /// Add `Secure` to the session cookie; enable behind HTTPS
    #[serde(default)]
    pub secure_cookie: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_minutes: 120,
            cleanup_interval_minutes: 10,
            secure_cookie: false,
        }
    }
}

/// Development proxy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    pub enabled: bool,

    /// Path prefix forwarded verbatim to the target
    pub path_prefix: String,

    /// Origin requests are forwarded to
    pub target: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path_prefix: "/2/oauth2/token".to_string(),
            target: "https://api.twitter.com".to_string(),
        }
    }
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            http: HttpConfig {
                port: 3000,
                bind_address: "127.0.0.1".to_string(),
            },
            backend: BackendConfig {
                base_url: "http://localhost:8000".to_string(),
                request_timeout_secs: 30,
            },
            oauth: OAuthConfig {
                token_url: "https://api.twitter.com/2/oauth2/token".to_string(),
                client_id: "your_client_id_here".to_string(),
                client_secret: "your_client_secret_here".to_string(),
                redirect_uri: "http://localhost:3000".to_string(),
                code_verifier: default_code_verifier(),
            },
            claim: ClaimConfig {
                only_native_token_default: true,
                chains: default_catalogue(),
            },
            session: SessionConfig::default(),
            proxy: ProxyConfig::default(),
        }
    }
}

impl FrontendConfig {
    /// Load configuration from a TOML file, overlaid with
    /// `FAUCET_FRONTEND__SECTION__KEY` environment variables
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(config::Environment::with_prefix("FAUCET_FRONTEND").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        url::Url::parse(&self.backend.base_url)
            .map_err(|e| anyhow::anyhow!("Invalid backend URL '{}': {}", self.backend.base_url, e))?;

        url::Url::parse(&self.oauth.token_url)
            .map_err(|e| anyhow::anyhow!("Invalid token URL '{}': {}", self.oauth.token_url, e))?;

        if self.oauth.client_id == "your_client_id_here" || self.oauth.client_id.is_empty() {
            return Err(anyhow::anyhow!("OAuth client id must be configured"));
        }

        if self.oauth.client_secret == "your_client_secret_here" || self.oauth.client_secret.is_empty() {
            return Err(anyhow::anyhow!("OAuth client secret must be configured"));
        }

        if self.claim.chains.is_empty() {
            return Err(anyhow::anyhow!("At least one chain must be configured"));
        }

        if self.backend.request_timeout_secs == 0 {
            return Err(anyhow::anyhow!("Request timeout must be greater than 0"));
        }

        if self.session.ttl_minutes == 0 || self.session.cleanup_interval_minutes == 0 {
            return Err(anyhow::anyhow!("Session lifetimes must be greater than 0"));
        }

        if self.session.ttl_minutes > MAX_SESSION_MINUTES
            || self.session.cleanup_interval_minutes > MAX_SESSION_MINUTES
        {
            return Err(anyhow::anyhow!(
                "Session lifetimes must not exceed {} minutes",
                MAX_SESSION_MINUTES
            ));
        }

        if self.proxy.enabled {
            url::Url::parse(&self.proxy.target)
                .map_err(|e| anyhow::anyhow!("Invalid proxy target '{}': {}", self.proxy.target, e))?;
            if !self.proxy.path_prefix.starts_with('/') {
                return Err(anyhow::anyhow!("Proxy path prefix must start with '/'"));
            }

            let prefix = self.proxy.path_prefix.trim_end_matches('/');
            if prefix.is_empty() || prefix.contains(['*', ':']) {
                return Err(anyhow::anyhow!(
                    "Proxy path prefix '{}' must name a literal sub-path",
                    self.proxy.path_prefix
                ));
            }
            if PAGE_ROUTES.contains(&prefix) {
                return Err(anyhow::anyhow!(
                    "Proxy path prefix '{}' collides with a page route",
                    self.proxy.path_prefix
                ));
            }
        }

        Ok(())
    }
}
