use reqwest::Method;
use tracing::debug;

use shared_gateway::BackendClient;
use shared_models::ApiError;

use crate::models::{StaffUser, UpdateUserRequest};

/// Staff account administration. Photo upload exists upstream but is not
/// consumed here.
pub struct UserService {
    client: BackendClient,
}

impl UserService {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<StaffUser>, ApiError> {
        debug!("listing staff users");
        self.client.get("/api/users").await
    }

    pub async fn get(&self, user_id: i64) -> Result<StaffUser, ApiError> {
        debug!(user_id, "fetching staff user");
        self.client.get(&format!("/api/users/{user_id}")).await
    }

    pub async fn update(
        &self,
        user_id: i64,
        request: &UpdateUserRequest,
    ) -> Result<StaffUser, ApiError> {
        debug!(user_id, "updating staff user");
        self.client
            .put(
                &format!("/api/users/{user_id}"),
                serde_json::to_value(request)?,
            )
            .await
    }

    pub async fn remove(&self, user_id: i64) -> Result<(), ApiError> {
        debug!(user_id, "deleting staff user");
        self.client
            .execute(Method::DELETE, &format!("/api/users/{user_id}"), None)
            .await
    }
}
