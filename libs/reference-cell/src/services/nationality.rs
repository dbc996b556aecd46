use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use shared_config::AppConfig;
use shared_models::ApiError;

/// Short list shown when the countries API is unreachable; covers the
/// nationalities the shelter actually receives.
pub fn fallback_nationalities() -> Vec<String> {
    ["Brasil", "Argentina", "Chile", "Uruguai", "Paraguai"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Read-only client for the countries reference API.
pub struct NationalityService {
    client: Client,
    base_url: String,
}

impl NationalityService {
    pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.countries_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Sorted common country names, with "Brazil" localized to "Brasil".
    pub async fn nationalities(&self) -> Result<Vec<String>, ApiError> {
        #[derive(Deserialize)]
        struct Country {
            name: CountryName,
        }

        #[derive(Deserialize)]
        struct CountryName {
            common: String,
        }

        let url = format!("{}/all?fields=name", self.base_url);
        debug!(%url, "fetching nationalities");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::Server {
                status: response.status().as_u16(),
                message: "countries fetch failed".to_string(),
            });
        }

        let countries: Vec<Country> = response.json().await?;
        let mut names: Vec<String> = countries
            .into_iter()
            .map(|country| {
                if country.name.common == "Brazil" {
                    "Brasil".to_string()
                } else {
                    country.name.common
                }
            })
            .collect();
        names.sort();
        Ok(names)
    }
}
