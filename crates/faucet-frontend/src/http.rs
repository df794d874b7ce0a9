//! HTTP server and page handlers for the faucet frontend.

use crate::{
    config::FrontendConfig,
    error::{FrontendError, FrontendResult},
    pages::{FormState, HomePage, Notice},
    proxy::DevProxy,
    state::{session_id_from_cookies, SessionStore},
};
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{AppendHeaders, Html, IntoResponse, Json, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use faucet_core::{
    BackendClient, CallbackParams, ChainOption, ChainSelection, ClaimRequest, FaucetClientError,
    OAuthClient, SessionTokens,
};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, sync::Arc, time::Duration};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

/// Paths served by the frontend itself; the dev proxy may not claim them
pub const PAGE_ROUTES: [&str; 6] = ["/", "/auth", "/login", "/logout", "/claim", "/health"];

/// Claim form presentation settings
#[derive(Debug, Clone)]
pub struct FormSettings {
    pub chains: Vec<ChainOption>,
    pub only_native_token_default: bool,
}

impl FormSettings {
    fn initial_form(&self) -> FormState {
        FormState::initial(&self.chains, self.only_native_token_default)
    }
}

/// Shared application state
#[derive(Debug, Clone)]
pub struct SharedState {
    pub sessions: Arc<SessionStore>,
    pub oauth: Arc<OAuthClient>,
    pub backend: Arc<BackendClient>,
    pub form: Arc<FormSettings>,
}

impl SharedState {
    /// Build clients and an empty session store from configuration
    pub fn from_config(config: &FrontendConfig) -> FrontendResult<Self> {
        let timeout = Duration::from_secs(config.backend.request_timeout_secs);

        Ok(Self {
            sessions: Arc::new(
                SessionStore::new(config.session.ttl_minutes)
                    .with_secure_cookie(config.session.secure_cookie),
            ),
            oauth: Arc::new(OAuthClient::new((&config.oauth).into(), timeout)?),
            backend: Arc::new(BackendClient::new(&config.backend.base_url, timeout)?),
            form: Arc::new(FormSettings {
                chains: config.claim.chains.clone(),
                only_native_token_default: config.claim.only_native_token_default,
            }),
        })
    }

    /// Tokens of the session named by the request's cookie
    fn current_session(&self, headers: &HeaderMap) -> Option<SessionTokens> {
        let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
        self.sessions.tokens(session_id_from_cookies(cookies)?)
    }
}

/// Fields posted by the claim form. Unchecked checkboxes are omitted.
#[derive(Debug, Serialize, Deserialize)]
pub struct ClaimForm {
    pub chain: Option<String>,
    #[serde(default)]
    pub address: String,
    pub only_native_token: Option<String>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub active_sessions: usize,
    pub backend_url: String,
}

/// Create the HTTP router with all endpoints
pub fn create_router(state: SharedState, proxy: Option<DevProxy>) -> Router {
    let mut router = Router::new()
        .route("/", get(home))
        .route("/auth", get(auth_callback))
        .route("/login", get(login))
        .route("/logout", post(logout))
        .route("/claim", post(claim))
        .route("/health", get(health))
        .with_state(state);

    if let Some(proxy) = proxy {
        info!("Development proxy enabled for {}", proxy.path_prefix());
        router = router.merge(proxy.router());
    }

    // Spans carry the path only; callback query strings hold credentials.
    let trace = TraceLayer::new_for_http().make_span_with(|request: &axum::extract::Request| {
        tracing::debug_span!("request", method = %request.method(), path = %request.uri().path())
    });

    router.layer(ServiceBuilder::new().layer(trace))
}

fn render_page(
    state: &SharedState,
    authenticated: bool,
    form: &FormState,
    notice: Option<Notice>,
) -> Html<String> {
    Html(
        HomePage {
            authenticated,
            chains: &state.form.chains,
            form,
            notice,
        }
        .render(),
    )
}

/// Home page; also accepts the provider's redirect when it lands on `/`
async fn home(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    handle_callback(&state, &headers, CallbackParams::from_query_map(&query)).await
}

/// OAuth redirect target
async fn auth_callback(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    handle_callback(&state, &headers, CallbackParams::from_query_map(&query)).await
}

async fn handle_callback(state: &SharedState, headers: &HeaderMap, params: CallbackParams) -> Response {
    let session = state.current_session(headers);

    let code = match params {
        CallbackParams::Missing => {
            let form = state.form.initial_form();
            return render_page(state, session.is_some(), &form, None).into_response();
        }
        CallbackParams::RequestToken { .. } => {
            debug!("Legacy request-token callback received, nothing to exchange");
            return Redirect::to("/").into_response();
        }
        CallbackParams::AuthorizationCode { code, .. } => code,
    };

    // The exchange runs once per session; a reload of the callback URL
    // with a live session must not burn the code a second time.
    if session.is_some() {
        debug!("Session already authenticated, skipping code exchange");
        return Redirect::to("/").into_response();
    }

    let tokens = match state.oauth.exchange_code(&code).await {
        Ok(tokens) => tokens,
        Err(e) => {
            log_upstream_failure("Token exchange", &e);
            let form = state.form.initial_form();
            return (
                StatusCode::BAD_GATEWAY,
                render_page(state, false, &form, Some(Notice::LoginFailed)),
            )
                .into_response();
        }
    };

    let id = state.sessions.create(tokens.clone());
    info!("Login completed, session {} created", id);

    match state.backend.establish_session(&tokens).await {
        Ok(reply) => info!("Backend session response ({}): {}", reply.status, reply.body),
        Err(e) => warn!("Backend session call failed: {}", e),
    }

    (
        AppendHeaders([(header::SET_COOKIE, state.sessions.set_cookie(&id))]),
        Redirect::to("/"),
    )
        .into_response()
}

/// Send the browser to the backend's OAuth entry point
async fn login(State(state): State<SharedState>) -> FrontendResult<Redirect> {
    let url = state.backend.login_url()?;
    debug!("Redirecting to {}", url);
    Ok(Redirect::to(url.as_str()))
}

/// Forget the current session
async fn logout(State(state): State<SharedState>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(id) = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(session_id_from_cookies)
    {
        if state.sessions.remove(id) {
            info!("Session {} logged out", id);
        }
    }

    (
        AppendHeaders([(header::SET_COOKIE, state.sessions.clear_cookie())]),
        Redirect::to("/"),
    )
}

/// Submit the claim form
async fn claim(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Form(form): Form<ClaimForm>,
) -> Response {
    let chain = form.chain.as_deref().map(str::parse::<ChainSelection>);
    let submitted = FormState {
        chain: match &chain {
            Some(Ok(chain)) => *chain,
            _ => state.form.initial_form().chain,
        },
        address: form.address.clone(),
        only_native_token: form.only_native_token.is_some(),
    };

    let Some(tokens) = state.current_session(&headers) else {
        info!("Not logged in");
        return (
            StatusCode::UNAUTHORIZED,
            render_page(&state, false, &submitted, None),
        )
            .into_response();
    };

    if let Some(Err(e)) = chain {
        warn!("{}", e);
        return (
            StatusCode::BAD_REQUEST,
            render_page(&state, true, &submitted, Some(Notice::InvalidChain)),
        )
            .into_response();
    }

    let request = ClaimRequest::new(
        submitted.address.clone(),
        submitted.chain,
        submitted.only_native_token,
    );

    match state.backend.submit_claim(&tokens, &request).await {
        Ok(reply) => {
            info!("Funds claimed successfully");
            info!("{}", reply.body);
            let reset = state.form.initial_form();
            render_page(&state, true, &reset, Some(Notice::ClaimSucceeded)).into_response()
        }
        Err(e) => {
            log_upstream_failure("Claim", &e);
            (
                StatusCode::BAD_GATEWAY,
                render_page(&state, true, &submitted, Some(Notice::ClaimFailed)),
            )
                .into_response()
        }
    }
}

/// Health check endpoint
async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        active_sessions: state.sessions.len(),
        backend_url: state.backend.base_url().to_string(),
    })
}

/// Dump everything known about a failed upstream call to the log.
fn log_upstream_failure(what: &str, err: &FaucetClientError) {
    match err {
        FaucetClientError::Status {
            endpoint,
            status,
            headers,
            body,
        } => {
            error!("{} failed: {} answered {}", what, endpoint, status);
            error!("Response body: {}", body);
            error!("Response headers: {:?}", headers);
        }
        other => error!("{} failed: {}", what, other),
    }
}

/// Start the HTTP server
pub async fn start_server(config: &FrontendConfig) -> FrontendResult<()> {
    info!("Starting faucet frontend...");

    let state = SharedState::from_config(config)?;

    let proxy = if config.proxy.enabled {
        Some(DevProxy::new(
            &config.proxy,
            Duration::from_secs(config.backend.request_timeout_secs),
        )?)
    } else {
        None
    };

    // Start cleanup task
    let cleanup_sessions = state.sessions.clone();
    let cleanup_interval = config.session.cleanup_interval_minutes;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(cleanup_interval.saturating_mul(60)));

        loop {
            interval.tick().await;
            cleanup_sessions.cleanup();
        }
    });

    let app = create_router(state, proxy);

    let bind_addr = format!("{}:{}", config.http.bind_address, config.http.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| FrontendError::Internal(anyhow::anyhow!("Failed to bind to {}: {}", bind_addr, e)))?;

    info!("Faucet frontend listening on {}", bind_addr);
    info!("Endpoints:");
    info!("  GET  /        - Login control and claim form");
    info!("  GET  /auth    - OAuth callback");
    info!("  GET  /login   - Redirect to the backend login");
    info!("  POST /claim   - Submit a claim");
    info!("  POST /logout  - End the session");
    info!("  GET  /health  - Health check");

    axum::serve(listener, app)
        .await
        .map_err(|e| FrontendError::Internal(anyhow::anyhow!("Server error: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::session_cookie;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_state() -> SharedState {
        let mut config = FrontendConfig::default();
        config.oauth.client_id = "client".to_string();
        config.oauth.client_secret = "secret".to_string();
        SharedState::from_config(&config).unwrap()
    }

    #[tokio::test]
    async fn test_login_redirects_to_backend() {
        let app = create_router(test_state(), None);

        let response = app
            .oneshot(Request::builder().uri("/login").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "http://localhost:8000/login/twitter"
        );
    }

    #[tokio::test]
    async fn test_request_token_callback_redirects_home() {
        let app = create_router(test_state(), None);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/auth?oauth_token=t&oauth_verifier=v")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLogs {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[tokio::test]
    async fn test_request_token_values_stay_out_of_logs() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let app = create_router(test_state(), None);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/auth?oauth_token=leaky-token&oauth_verifier=leaky-verifier")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("Legacy request-token callback received"));
        assert!(!output.contains("leaky-token"));
        assert!(!output.contains("leaky-verifier"));
    }

    #[tokio::test]
    async fn test_logout_expires_cookie() {
        let state = test_state();
        let id = state.sessions.create(SessionTokens::new("access"));
        let app = create_router(state.clone(), None);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/logout")
                    .header(header::COOKIE, session_cookie(&id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let cookie = response.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
        assert!(cookie.contains("Max-Age=0"));
        assert!(state.sessions.is_empty());
    }

    #[tokio::test]
    async fn test_health() {
        let app = create_router(test_state(), None);

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["active_sessions"], 0);
    }
}
