use reqwest::Method;
use tracing::{debug, info, warn};

use shared_gateway::BackendClient;
use shared_models::{ApiError, SessionState};

use crate::models::{Credentials, LoginResponse, RegisterRequest};

/// Auth flows against the session gateway. Owns no state of its own; the
/// outcome of every flow lands in the shared [`SessionContext`] carried by
/// the client.
///
/// [`SessionContext`]: shared_models::SessionContext
pub struct SessionService {
    client: BackendClient,
}

impl SessionService {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    /// Primes the CSRF cookie, authenticates, and installs the session in
    /// one atomic write.
    pub async fn login(&self, credentials: &Credentials) -> Result<SessionState, ApiError> {
        debug!(username = %credentials.username, "logging in");

        self.client.refresh_csrf().await?;
        let response: LoginResponse = self
            .client
            .post("/api/login", serde_json::to_value(credentials)?)
            .await?;

        let role = response
            .role
            .or_else(|| {
                response
                    .user
                    .as_ref()
                    .and_then(|profile| profile.role.clone())
            })
            .unwrap_or_else(|| "employee".to_string());

        let state = SessionState {
            token: response.token,
            role,
            user_id: response.user.as_ref().map(|profile| profile.id),
            photo_url: response
                .user
                .as_ref()
                .and_then(|profile| profile.photo_url.clone()),
        };

        self.client.session().begin(state.clone());
        info!(role = %state.role, "login succeeded");
        Ok(state)
    }

    /// Revokes the remote token and clears the local session. The context is
    /// cleared even when the remote call fails; an unreachable backend must
    /// never keep an operator logged in locally.
    pub async fn logout(&self) -> Result<(), ApiError> {
        debug!("logging out");
        let result = self.client.execute(Method::POST, "/api/logout", None).await;
        self.client.session().clear();

        if let Err(err) = &result {
            warn!("remote logout failed, session cleared anyway: {err}");
        }
        result
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError> {
        debug!(email = %request.email, "registering staff account");
        self.client.refresh_csrf().await?;
        self.client
            .execute(
                Method::POST,
                "/api/register",
                Some(serde_json::to_value(request)?),
            )
            .await
    }
}
