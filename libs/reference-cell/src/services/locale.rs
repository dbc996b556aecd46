use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use shared_config::AppConfig;
use shared_models::ApiError;

use crate::models::{Municipality, State};

/// Read-only client for the IBGE localities API. No authentication; the
/// service is public reference data.
#[derive(Debug)]
pub struct LocaleService {
    client: Client,
    base_url: String,
}

impl LocaleService {
    pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.ibge_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn states(&self) -> Result<Vec<State>, ApiError> {
        let url = format!("{}/estados", self.base_url);
        debug!(%url, "fetching states");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::Server {
                status: response.status().as_u16(),
                message: "IBGE states fetch failed".to_string(),
            });
        }
        Ok(response.json().await?)
    }

    pub async fn municipalities(&self, state_id: i64) -> Result<Vec<Municipality>, ApiError> {
        let url = format!("{}/estados/{}/municipios", self.base_url, state_id);
        debug!(%url, "fetching municipalities");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::Server {
                status: response.status().as_u16(),
                message: "IBGE municipalities fetch failed".to_string(),
            });
        }

        let municipalities: Vec<Municipality> = response.json().await?;
        if municipalities.is_empty() {
            warn!(state_id, "no municipalities returned for state");
        }
        Ok(municipalities)
    }
}
