//! Development proxy towards the OAuth provider.
//!
//! Forwards everything under a fixed path prefix to another origin so a page
//! served locally can reach the provider without cross-origin failures. The
//! `Host` header is rewritten to the target (change-origin).

use crate::config::ProxyConfig;
use crate::error::{FrontendError, FrontendResult};
use crate::http::PAGE_ROUTES;
use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderMap, Method, Uri},
    response::Response,
    routing::any,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Drop connection-level headers that must not be forwarded
fn strip_hop_by_hop(headers: &mut HeaderMap) {
    for name in [
        header::HOST,
        header::CONNECTION,
        header::CONTENT_LENGTH,
        header::TRANSFER_ENCODING,
        header::UPGRADE,
    ] {
        headers.remove(name);
    }
}

/// Forwarding target and the client used to reach it
#[derive(Debug, Clone)]
pub struct DevProxy {
    http_client: reqwest::Client,
    target: Url,
    path_prefix: String,
}

impl DevProxy {
    pub fn new(config: &ProxyConfig, timeout: Duration) -> FrontendResult<Self> {
        let target = Url::parse(&config.target)
            .map_err(|e| FrontendError::Proxy(format!("Invalid proxy target: {}", e)))?;
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| FrontendError::Proxy(format!("Failed to build proxy client: {}", e)))?;

        let path_prefix = config.path_prefix.trim_end_matches('/');
        if !path_prefix.starts_with('/')
            || path_prefix.contains(['*', ':'])
            || PAGE_ROUTES.contains(&path_prefix)
        {
            return Err(FrontendError::Proxy(format!(
                "Invalid proxy path prefix '{}'",
                config.path_prefix
            )));
        }

        Ok(Self {
            http_client,
            target,
            path_prefix: path_prefix.to_string(),
        })
    }

    pub fn path_prefix(&self) -> &str {
        &self.path_prefix
    }

    /// Target URL for an incoming request URI
    pub fn upstream_url(&self, uri: &Uri) -> FrontendResult<Url> {
        let path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
        self.target
            .join(path_and_query)
            .map_err(|e| FrontendError::Proxy(format!("Invalid upstream path: {}", e)))
    }

    /// Router serving the prefix and everything below it
    pub fn router(self) -> Router {
        let prefix = self.path_prefix.clone();
        Router::new()
            .route(&prefix, any(forward))
            .route(&format!("{}/*rest", prefix), any(forward))
            .with_state(Arc::new(self))
    }
}

async fn forward(
    State(proxy): State<Arc<DevProxy>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> FrontendResult<Response> {
    let url = proxy.upstream_url(&uri)?;
    debug!("Proxying {} {} -> {}", method, uri.path(), url);

    let mut outbound = headers;
    strip_hop_by_hop(&mut outbound);

    let upstream = proxy
        .http_client
        .request(method, url.clone())
        .headers(outbound)
        .body(body)
        .send()
        .await
        .map_err(|e| {
            warn!("Proxy request to {} failed: {}", url, e);
            FrontendError::Proxy(e.to_string())
        })?;

    let status = upstream.status();
    let mut response_headers = upstream.headers().clone();
    strip_hop_by_hop(&mut response_headers);
    let bytes = upstream
        .bytes()
        .await
        .map_err(|e| FrontendError::Proxy(e.to_string()))?;

    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    *response.headers_mut() = response_headers;
    Ok(response)
}
