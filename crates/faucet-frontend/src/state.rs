//! In-memory session store.
//!
//! A session exists only after a successful code exchange and lives until
//! logout, expiry, or process exit. Nothing is written to disk.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use faucet_core::SessionTokens;
use tracing::{debug, info};
use uuid::Uuid;

/// Name of the cookie carrying the session id.
pub const SESSION_COOKIE: &str = "faucet_session";

/// Session information stored in memory
#[derive(Debug, Clone)]
pub struct Session {
    pub tokens: SessionTokens,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Authenticated browser sessions keyed by an opaque id
#[derive(Debug)]
pub struct SessionStore {
    sessions: DashMap<String, Session>,
    ttl: Duration,
    secure_cookie: bool,
}

impl SessionStore {
    pub fn new(ttl_minutes: u64) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl: i64::try_from(ttl_minutes)
                .ok()
                .and_then(Duration::try_minutes)
                .unwrap_or(Duration::MAX),
            secure_cookie: false,
        }
    }

    /// Mark issued cookies `Secure` so browsers only send them over HTTPS
    pub fn with_secure_cookie(mut self, secure: bool) -> Self {
        self.secure_cookie = secure;
        self
    }

    /// Store freshly exchanged tokens and return the new session id
    pub fn create(&self, tokens: SessionTokens) -> String {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        self.sessions.insert(
            id.clone(),
            Session {
                tokens,
                created_at: now,
                expires_at: now.checked_add_signed(self.ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
            },
        );

        debug!("Created session {}", id);
        id
    }

    /// Tokens of a live session, if any
    pub fn tokens(&self, id: &str) -> Option<SessionTokens> {
        let session = self.sessions.get(id)?;
        if Utc::now() > session.expires_at {
            drop(session);
            self.sessions.remove(id);
            debug!("Session {} expired", id);
            return None;
        }
        Some(session.tokens.clone())
    }

    /// Drop a session; returns whether it existed
    pub fn remove(&self, id: &str) -> bool {
        self.sessions.remove(id).is_some()
    }

    /// Remove expired sessions
    pub fn cleanup(&self) {
        let now = Utc::now();
        self.sessions.retain(|_, session| session.expires_at >= now);
        info!("Session cleanup completed: {} active sessions", self.sessions.len());
    }

    /// `Set-Cookie` value for a newly created session
    pub fn set_cookie(&self, id: &str) -> String {
        self.secured(session_cookie(id))
    }

    /// `Set-Cookie` value ending the browser's session
    pub fn clear_cookie(&self) -> String {
        self.secured(expired_session_cookie())
    }

    fn secured(&self, cookie: String) -> String {
        if self.secure_cookie {
            format!("{}; Secure", cookie)
        } else {
            cookie
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Build the `Set-Cookie` value binding a browser to a session
pub fn session_cookie(id: &str) -> String {
    format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, id)
}

/// `Set-Cookie` value that makes the browser forget its session
pub fn expired_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}

/// Extract the session id from a `Cookie` header value
pub fn session_id_from_cookies(cookie_header: &str) -> Option<&str> {
    cookie_header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}
