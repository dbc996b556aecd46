use std::env;
use tracing::warn;

/// Per-room capacity applied when no override is configured.
///
/// Capacity is a deliberate constant, not derived from the bed reference
/// list: the bed endpoint is occupant display data and may be unavailable
/// while the availability banner still has to render.
pub const DEFAULT_ROOM_CAPACITY: u32 = 4;

const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_IBGE_URL: &str = "https://servicodados.ibge.gov.br/api/v1/localidades";
const DEFAULT_COUNTRIES_URL: &str = "https://restcountries.com/v3.1";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub ibge_base_url: String,
    pub countries_base_url: String,
    pub room_capacity: u32,
    pub request_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            api_base_url: env::var("SHELTER_API_URL").unwrap_or_else(|_| {
                warn!("SHELTER_API_URL not set, using default {}", DEFAULT_API_URL);
                DEFAULT_API_URL.to_string()
            }),
            ibge_base_url: env::var("SHELTER_IBGE_URL")
                .unwrap_or_else(|_| DEFAULT_IBGE_URL.to_string()),
            countries_base_url: env::var("SHELTER_COUNTRIES_URL")
                .unwrap_or_else(|_| DEFAULT_COUNTRIES_URL.to_string()),
            room_capacity: env::var("SHELTER_ROOM_CAPACITY")
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or_else(|| {
                    warn!(
                        "SHELTER_ROOM_CAPACITY not set, using default {}",
                        DEFAULT_ROOM_CAPACITY
                    );
                    DEFAULT_ROOM_CAPACITY
                }),
            request_timeout_secs: env::var("SHELTER_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(30),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.api_base_url.is_empty()
    }

    /// Base URL for backend-hosted uploads (guest photos).
    pub fn storage_base_url(&self) -> String {
        format!("{}/storage", self.api_base_url.trim_end_matches('/'))
    }
}
