use reqwest::Method;
use serde_json::json;
use tracing::debug;

use shared_gateway::BackendClient;
use shared_models::ApiError;

use crate::services::directory::Directory;

/// Soft hide/unhide. Hidden records leave the default views and free their
/// bed, but stay queryable by name search.
pub struct VisibilityService {
    client: BackendClient,
}

impl VisibilityService {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    /// Remote visibility update. No local state is touched here, so a
    /// failure leaves the displayed set unchanged.
    pub async fn set_hidden(&self, id: i64, hidden: bool) -> Result<(), ApiError> {
        debug!(id, hidden, "updating appointment visibility");
        self.client
            .execute(
                Method::PUT,
                &format!("/api/appointments/{id}/hide"),
                Some(json!({ "isHidden": hidden })),
            )
            .await
    }

    /// Hides the record and, on success, flips the local directory entry.
    /// The caller recomputes availability afterwards, since hiding frees an
    /// occupied bed.
    pub async fn hide(&self, directory: &mut Directory, id: i64) -> Result<(), ApiError> {
        self.set_hidden(id, true).await?;
        directory.set_hidden(id, true);
        Ok(())
    }

    pub async fn unhide(&self, directory: &mut Directory, id: i64) -> Result<(), ApiError> {
        self.set_hidden(id, false).await?;
        directory.set_hidden(id, false);
        Ok(())
    }
}
