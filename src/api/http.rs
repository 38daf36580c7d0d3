//! reqwest-backed [`Backend`] implementation.
//!
//! No request timeout is configured: a hung request keeps its loading
//! indicator up until the transport itself resolves or errors.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{ApiError, Backend};
use crate::constants;
use crate::models::bumble::LaunchResult;
use crate::models::chat::{ChatReply, ChatRequest};
use crate::models::github::{
    AnalyzeRequest, AutofixRequest, AutofixResult, InstallationList, PrReviewResult,
    TokenValidation, ValidateTokenRequest,
};
use crate::models::review::{ReviewRequest, ReviewResult};
use crate::models::rewrite::{RewriteRequest, RewriteResult};

/// JSON-over-HTTP client for the review service.
#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a client for the service rooted at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .user_agent(format!("{}/{}", constants::APP_NAME, constants::VERSION))
            .build()
            .map_err(|e| ApiError::Config(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        tracing::debug!(%url, "POST");
        let response = self.client.post(&url).json(body).send().await?;
        Self::decode(response).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        tracing::debug!(%url, "GET");
        let response = self.client.get(&url).send().await?;
        Self::decode(response).await
    }

    /// Turn a response into `T`, or into [`ApiError::Status`] carrying the
    /// error body's `detail` member.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("detail").cloned());
            return Err(ApiError::Status {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                detail,
            });
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn review(&self, request: &ReviewRequest) -> Result<ReviewResult, ApiError> {
        self.post(constants::PATH_REVIEW, request).await
    }

    async fn rewrite(&self, request: &RewriteRequest) -> Result<RewriteResult, ApiError> {
        self.post(constants::PATH_REWRITE, request).await
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, ApiError> {
        self.post(constants::PATH_CHAT, request).await
    }

    async fn installations(&self) -> Result<InstallationList, ApiError> {
        self.get(constants::PATH_INSTALLATIONS).await
    }

    async fn validate_token(
        &self,
        request: &ValidateTokenRequest,
    ) -> Result<TokenValidation, ApiError> {
        self.post(constants::PATH_VALIDATE_TOKEN, request).await
    }

    async fn analyze_pr(&self, request: &AnalyzeRequest) -> Result<PrReviewResult, ApiError> {
        self.post(constants::PATH_ANALYZE_PR, request).await
    }

    async fn autofix_pr(&self, request: &AutofixRequest) -> Result<AutofixResult, ApiError> {
        self.post(constants::PATH_AUTOFIX_PR, request).await
    }

    async fn launch_bumble(&self) -> Result<LaunchResult, ApiError> {
        self.post(constants::PATH_BUMBLE_LAUNCH, &serde_json::json!({}))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_double_slash() {
        let backend = HttpBackend::new("http://localhost:8000/api/").unwrap();
        assert_eq!(backend.url("/review"), "http://localhost:8000/api/review");
        let backend = HttpBackend::new("http://localhost:8000/api").unwrap();
        assert_eq!(
            backend.url(constants::PATH_VALIDATE_TOKEN),
            "http://localhost:8000/api/github-simple/validate-token"
        );
    }
}
