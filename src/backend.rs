//! Backend API client for the VeritasTrial server.
//!
//! Wraps the three backend endpoints (`/retrieve`, `/meta/{id}`,
//! `/chat/{model}/{id}`) plus the `/heartbeat` probe. Every failure mode is
//! representable as [`ApiError`], whose `Display` output is the exact string
//! shown to the user in an error bubble; callers never see a panic or an
//! unformatted error.

use reqwest::Client;

use crate::models::{
    ChatPayload, ChatResponse, HeartbeatResponse, MetaResponse, ModelId, RetrieveResponse,
    TrialFilters, TrialMetadata,
};

/// Default backend location, overridable via `VERITAS_BACKEND_URL`.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8001";

/// Error type for backend client operations.
///
/// `Server` carries the backend's non-2xx error body convention
/// (`{ "details": string }`); its `Display` output matches the format the
/// original web client rendered in-thread.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Transport failure or malformed response payload.
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    /// Request serialization failed.
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    /// Server returned a non-success status.
    #[error("Status {status} ({status_text}); caused by:\n\n{details}")]
    Server {
        status: u16,
        status_text: String,
        details: String,
    },
}

/// Client for the VeritasTrial backend API.
///
/// Holds a reusable [`reqwest::Client`]; cheap to clone behind an `Arc`.
#[derive(Debug)]
pub struct BackendClient {
    base_url: String,
    client: Client,
}

impl BackendClient {
    /// Create a client against the default base URL.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client against a custom base URL (tests point this at a
    /// mock server).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: Client::new(),
        }
    }

    /// Base URL this client targets.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Convert a non-success response into [`ApiError::Server`].
    ///
    /// The backend is expected to send `{ "details": string }`; when the
    /// body is missing or malformed the raw text (or a generic fallback)
    /// stands in so the error is never silently dropped.
    async fn server_error(response: reqwest::Response) -> ApiError {
        let status = response.status();
        let status_text = status
            .canonical_reason()
            .unwrap_or("Unknown Status")
            .to_string();
        let body = response.text().await.unwrap_or_default();
        let details = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|value| value.get("details")?.as_str().map(str::to_string))
            .unwrap_or_else(|| {
                if body.is_empty() {
                    "Unknown error".to_string()
                } else {
                    body
                }
            });
        ApiError::Server {
            status: status.as_u16(),
            status_text,
            details,
        }
    }

    /// Call `GET /retrieve` with the query, top-k and serialized filters.
    pub async fn retrieve(
        &self,
        query: &str,
        top_k: u32,
        filters: &TrialFilters,
    ) -> Result<RetrieveResponse, ApiError> {
        let filters_serialized = serde_json::to_string(filters)?;
        let url = format!(
            "{}/retrieve?query={}&top_k={}&filters_serialized={}",
            self.base_url,
            urlencoding::encode(query),
            top_k,
            urlencoding::encode(&filters_serialized),
        );
        tracing::debug!(%url, "retrieve request");
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(Self::server_error(response).await);
        }
        Ok(response.json().await?)
    }

    /// Call `GET /meta/{id}` for one trial's full metadata.
    pub async fn meta(&self, trial_id: &str) -> Result<TrialMetadata, ApiError> {
        let url = format!("{}/meta/{}", self.base_url, trial_id);
        tracing::debug!(%url, "meta request");
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(Self::server_error(response).await);
        }
        let meta: MetaResponse = response.json().await?;
        Ok(meta.metadata)
    }

    /// Call `POST /chat/{model}/{id}` with the user's query.
    pub async fn chat(
        &self,
        query: &str,
        model: ModelId,
        trial_id: &str,
    ) -> Result<String, ApiError> {
        let url = format!("{}/chat/{}/{}", self.base_url, model.as_str(), trial_id);
        tracing::debug!(%url, "chat request");
        let response = self
            .client
            .post(&url)
            .json(&ChatPayload {
                query: query.to_string(),
            })
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::server_error(response).await);
        }
        let chat: ChatResponse = response.json().await?;
        Ok(chat.response)
    }

    /// Probe `GET /heartbeat`; true when the backend answers.
    pub async fn heartbeat(&self) -> Result<bool, ApiError> {
        let url = format!("{}/heartbeat", self.base_url);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Ok(false);
        }
        let _beat: HeartbeatResponse = response.json().await?;
        Ok(true)
    }
}

impl Default for BackendClient {
    fn default() -> Self {
        Self::new()
    }
}
