//! Cookie-session store and authenticated-user extractor.
//!
//! Sessions are held in memory only; a server restart signs everyone out.
//! The session id is an opaque random token mapped to the user id it was
//! minted for.

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;
use dashmap::DashMap;
use rand::RngCore;
use std::fmt::Write as _;
use std::sync::Arc;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "delist_session";

/// In-memory session-id to user-id map.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<DashMap<String, String>>,
}

impl SessionStore {
    /// Create an empty session store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a new session for a user and return its id.
    #[must_use]
    pub fn create(&self, user_id: &str) -> String {
        let mut bytes = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut bytes);
        let session_id = bytes.iter().fold(String::with_capacity(32), |mut s, b| {
            let _ = write!(s, "{b:02x}");
            s
        });

        self.sessions
            .insert(session_id.clone(), user_id.to_string());
        session_id
    }

    /// Resolve a session id to its user id.
    #[must_use]
    pub fn user_id(&self, session_id: &str) -> Option<String> {
        self.sessions.get(session_id).map(|entry| entry.clone())
    }
}

/// The authenticated caller, resolved from the session cookie.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Id of the user the session belongs to.
    pub user_id: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let session_id = jar
            .get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .ok_or(ApiError::Unauthorized)?;

        let user_id = state
            .sessions
            .user_id(&session_id)
            .ok_or(ApiError::Unauthorized)?;

        Ok(Self { user_id })
    }
}
