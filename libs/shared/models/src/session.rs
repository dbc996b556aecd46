use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use tracing::debug;

/// Everything the client remembers about an authenticated operator.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub token: String,
    pub role: String,
    pub user_id: Option<i64>,
    pub photo_url: Option<String>,
}

/// Process-local session handle shared by every collaborator.
///
/// Replaces the legacy browser-storage layout (auth token, role, user id,
/// cached photo URL spread over individual keys) with a single record that
/// login populates and logout clears in one write.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    inner: Arc<RwLock<Option<SessionState>>>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<SessionState>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<SessionState>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Installs a fresh session atomically. Called by login.
    pub fn begin(&self, state: SessionState) {
        debug!(role = %state.role, "session started");
        *self.write() = Some(state);
    }

    /// Drops the whole session atomically. Called by logout and by the
    /// forced-logout error paths.
    pub fn clear(&self) {
        debug!("session cleared");
        *self.write() = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_some()
    }

    pub fn token(&self) -> Option<String> {
        self.read().as_ref().map(|state| state.token.clone())
    }

    pub fn role(&self) -> Option<String> {
        self.read().as_ref().map(|state| state.role.clone())
    }

    pub fn user_id(&self) -> Option<i64> {
        self.read().as_ref().and_then(|state| state.user_id)
    }

    pub fn photo_url(&self) -> Option<String> {
        self.read().as_ref().and_then(|state| state.photo_url.clone())
    }

    /// Expiry instant of the current token, when it is an inspectable JWT.
    /// Opaque tokens (Sanctum personal access tokens) yield `None`.
    pub fn token_expiry(&self) -> Option<DateTime<Utc>> {
        self.read()
            .as_ref()
            .and_then(|state| decode_jwt_expiry(&state.token))
    }

    /// Advisory freshness check. Only a decodable JWT with a past `exp`
    /// counts as stale; opaque tokens are left for the server to reject.
    pub fn is_token_current(&self) -> bool {
        match self.token_expiry() {
            Some(expiry) => expiry > Utc::now(),
            None => self.is_authenticated(),
        }
    }
}

fn decode_jwt_expiry(token: &str) -> Option<DateTime<Utc>> {
    #[derive(Deserialize)]
    struct Claims {
        exp: i64,
    }

    let payload = token.split('.').nth(1)?;
    let bytes = general_purpose::URL_SAFE_NO_PAD.decode(payload).ok()?;
    let claims: Claims = serde_json::from_slice(&bytes).ok()?;
    Utc.timestamp_opt(claims.exp, 0).single()
}
