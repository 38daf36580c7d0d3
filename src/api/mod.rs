//! Backend trait and HTTP integration.
//!
//! Orchestrators talk to the review service only through [`Backend`], so
//! tests can swap in a canned implementation without a network.

pub mod http;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::bumble::LaunchResult;
use crate::models::chat::{ChatReply, ChatRequest};
use crate::models::github::{
    AnalyzeRequest, AutofixRequest, AutofixResult, InstallationList, PrReviewResult,
    TokenValidation, ValidateTokenRequest,
};
use crate::models::review::{ReviewRequest, ReviewResult};
use crate::models::rewrite::{RewriteRequest, RewriteResult};

pub use http::HttpBackend;

/// Errors from backend calls.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("request failed with HTTP {status} {status_text}")]
    Status {
        status: u16,
        status_text: String,
        /// The `detail` member of the error body, when it was JSON.
        detail: Option<serde_json::Value>,
    },

    #[error("network error: {0}")]
    Transport(String),

    #[error("unexpected response from server: {0}")]
    Decode(String),

    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// The text to show to the user for this failure.
    ///
    /// For HTTP errors the precedence is `detail.user_message`, then
    /// `detail.message`, then a plain-string `detail`, then the status text.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status {
                status,
                status_text,
                detail,
            } => {
                let from_detail = detail.as_ref().and_then(|d| match d {
                    serde_json::Value::Object(map) => map
                        .get("user_message")
                        .and_then(|v| v.as_str())
                        .or_else(|| map.get("message").and_then(|v| v.as_str()))
                        .map(str::to_string),
                    serde_json::Value::String(s) => Some(s.clone()),
                    _ => None,
                });
                match from_detail.filter(|s| !s.trim().is_empty()) {
                    Some(message) => message,
                    None if !status_text.is_empty() => status_text.clone(),
                    None => format!("HTTP {status}"),
                }
            }
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

/// The review service as seen by the client.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn review(&self, request: &ReviewRequest) -> Result<ReviewResult, ApiError>;

    async fn rewrite(&self, request: &RewriteRequest) -> Result<RewriteResult, ApiError>;

    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, ApiError>;

    async fn installations(&self) -> Result<InstallationList, ApiError>;

    async fn validate_token(
        &self,
        request: &ValidateTokenRequest,
    ) -> Result<TokenValidation, ApiError>;

    /// A `success: false` body is still `Ok`; callers inspect the flag.
    async fn analyze_pr(&self, request: &AnalyzeRequest) -> Result<PrReviewResult, ApiError>;

    /// A `success: false` body is still `Ok`; callers inspect the flag.
    async fn autofix_pr(&self, request: &AutofixRequest) -> Result<AutofixResult, ApiError>;

    async fn launch_bumble(&self) -> Result<LaunchResult, ApiError>;
}
