use std::sync::Arc;
use std::time::Duration;

use reqwest::{
    cookie::{CookieStore, Jar},
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    Client, Method, StatusCode, Url,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, warn};

use shared_config::AppConfig;
use shared_models::{ApiError, SessionContext};

/// Laravel's non-standard "Page Expired" status for stale CSRF tokens.
const PAGE_EXPIRED: u16 = 419;

const CSRF_COOKIE: &str = "XSRF-TOKEN";
const CSRF_HEADER: &str = "X-XSRF-TOKEN";

/// REST gateway every first-party call flows through.
///
/// Carries the bearer token from the shared [`SessionContext`] and the CSRF
/// double-submit pair: the backend sets the `XSRF-TOKEN` cookie, and every
/// state-changing request echoes its decoded value in `X-XSRF-TOKEN`.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    cookies: Arc<Jar>,
    base_url: Url,
    session: SessionContext,
}

impl BackendClient {
    pub fn new(config: &AppConfig, session: SessionContext) -> Result<Self, ApiError> {
        let cookies = Arc::new(Jar::default());
        let client = Client::builder()
            .cookie_provider(cookies.clone())
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        let base_url = Url::parse(&config.api_base_url)
            .map_err(|err| ApiError::Decode(format!("invalid API base URL: {err}")))?;

        Ok(Self {
            client,
            cookies,
            base_url,
            session,
        })
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Primes the CSRF double-submit cookie.
    pub async fn refresh_csrf(&self) -> Result<(), ApiError> {
        let url = self.endpoint("/sanctum/csrf-cookie")?;
        debug!(%url, "refreshing CSRF cookie");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::classify(status, response).await)
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::GET, path, None).await
    }

    pub async fn post<T: DeserializeOwned>(&self, path: &str, body: Value) -> Result<T, ApiError> {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn put<T: DeserializeOwned>(&self, path: &str, body: Value) -> Result<T, ApiError> {
        self.request(Method::PUT, path, Some(body)).await
    }

    /// Sends a request and decodes the JSON response.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, ApiError> {
        let response = self.dispatch(method, path, body).await?;
        response
            .json::<T>()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))
    }

    /// Sends a request and discards the response body. Used for calls whose
    /// payload carries nothing the client needs (hide/unhide, logout,
    /// deletes).
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<(), ApiError> {
        self.dispatch(method, path, body).await.map(|_| ())
    }

    /// Shared send path. State-changing methods carry the CSRF header and
    /// get exactly one refresh-and-replay when the backend answers 419; a
    /// second 419 surfaces as [`ApiError::SessionExpired`].
    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<reqwest::Response, ApiError> {
        let mutating = !matches!(method, Method::GET | Method::HEAD);
        let mut response = self.send(method.clone(), path, body.clone(), mutating).await?;

        if mutating && response.status().as_u16() == PAGE_EXPIRED {
            warn!(path, "CSRF token expired, refreshing and replaying once");
            self.refresh_csrf().await?;
            response = self.send(method, path, body, true).await?;
            if response.status().as_u16() == PAGE_EXPIRED {
                return Err(ApiError::SessionExpired);
            }
        }

        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(Self::classify(status, response).await)
        }
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        mutating: bool,
    ) -> Result<reqwest::Response, ApiError> {
        let url = self.endpoint(path)?;
        debug!(%method, %url, "dispatching request");

        let mut request = self
            .client
            .request(method, url)
            .headers(self.headers(mutating));
        if let Some(body) = body {
            request = request.json(&body);
        }

        Ok(request.send().await?)
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|err| ApiError::Decode(format!("invalid request path {path}: {err}")))
    }

    fn headers(&self, mutating: bool) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = self.session.token() {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {token}")) {
                headers.insert(AUTHORIZATION, value);
            }
        }

        if mutating {
            if let Some(csrf) = self.csrf_token() {
                if let Ok(value) = HeaderValue::from_str(&csrf) {
                    headers.insert(CSRF_HEADER, value);
                }
            }
        }

        headers
    }

    /// Current XSRF cookie value. Laravel URL-encodes it; the header must
    /// carry the decoded form.
    fn csrf_token(&self) -> Option<String> {
        let header = self.cookies.cookies(&self.base_url)?;
        let raw = header.to_str().ok()?;
        raw.split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == CSRF_COOKIE)
            .and_then(|(_, value)| urlencoding::decode(value).ok())
            .map(|value| value.into_owned())
    }

    async fn classify(status: StatusCode, response: reqwest::Response) -> ApiError {
        let body = response.text().await.unwrap_or_default();
        error!("backend error ({}): {}", status, body);

        match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
            StatusCode::NOT_FOUND => ApiError::NotFound(message_from(&body)),
            StatusCode::CONFLICT => ApiError::Conflict(message_from(&body)),
            StatusCode::UNPROCESSABLE_ENTITY => first_field_error(&body),
            status if status.as_u16() == PAGE_EXPIRED => ApiError::SessionExpired,
            status => ApiError::Server {
                status: status.as_u16(),
                message: message_from(&body),
            },
        }
    }
}

/// Extracts Laravel's top-level `message`, falling back to the raw body.
fn message_from(body: &str) -> String {
    #[derive(Deserialize)]
    struct MessageBody {
        message: String,
    }

    serde_json::from_str::<MessageBody>(body)
        .map(|parsed| parsed.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

/// 422 payloads look like `{"message": ..., "errors": {"field": ["msg", …]}}`.
/// Only the first field error is surfaced.
fn first_field_error(body: &str) -> ApiError {
    #[derive(Deserialize)]
    struct ValidationBody {
        #[serde(default)]
        message: String,
        #[serde(default)]
        errors: serde_json::Map<String, Value>,
    }

    if let Ok(parsed) = serde_json::from_str::<ValidationBody>(body) {
        if let Some((field, messages)) = parsed.errors.iter().next() {
            let message = messages
                .as_array()
                .and_then(|entries| entries.first())
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| parsed.message.clone());
            return ApiError::Validation {
                field: field.clone(),
                message,
            };
        }
        if !parsed.message.is_empty() {
            return ApiError::Validation {
                field: String::new(),
                message: parsed.message,
            };
        }
    }

    ApiError::Validation {
        field: String::new(),
        message: "Dados inválidos.".to_string(),
    }
}
