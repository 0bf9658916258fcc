use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::retry::{is_retryable_status, with_retry, RetryConfig, Retryable};

const GITHUB_API_BASE: &str = "https://api.github.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("API request failed with status {status}: {body}")]
    RequestFailed {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Authentication required")]
    AuthRequired,

    #[error("Query rejected by GitHub: {0}")]
    InvalidQuery(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    ParseError(#[from] serde_json::Error),
}

impl Retryable for GitHubError {
    fn is_retryable(&self) -> bool {
        match self {
            GitHubError::RequestFailed { status, .. } => is_retryable_status(*status),
            GitHubError::NetworkError(e) => e.is_timeout() || e.is_connect(),
            // The search quota resets in minutes, not in backoff time
            GitHubError::RateLimitExceeded
            | GitHubError::AuthRequired
            | GitHubError::InvalidQuery(_)
            | GitHubError::ParseError(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, GitHubError>;

/// Body of `GET /search/repositories`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubSearchResponse {
    pub total_count: u64,
    #[serde(default)]
    pub incomplete_results: bool,
    pub items: Vec<GitHubRepo>,
}

/// One repository as the search endpoint returns it.
/// Only the fields we actually show are kept, serde drops the rest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubRepo {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub owner: GitHubOwner,
    pub description: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub stargazers_count: u32,
    #[serde(default)]
    pub forks_count: u32,
    pub language: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubOwner {
    pub login: String,
    pub avatar_url: Option<String>,
}

pub struct GitHubClient {
    client: reqwest::Client,
    token: Option<String>,
    base_url: String,
    retry_config: RetryConfig,
}

impl GitHubClient {
    pub fn new(token: Option<String>) -> Result<Self> {
        Self::with_base_url(token, GITHUB_API_BASE.to_string())
    }

    /// For GitHub Enterprise, or a local stub server
    pub fn with_base_url(token: Option<String>, base_url: String) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static(concat!(
                "starmark/",
                env!("CARGO_PKG_VERSION")
            )),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/vnd.github+json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            token,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry_config: RetryConfig::default(),
        })
    }

    pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Search repositories. The query is passed through untouched,
    /// GitHub decides what an empty or malformed query means.
    pub async fn search_repositories(
        &self,
        query: &str,
        per_page: u32,
    ) -> Result<GitHubSearchResponse> {
        let url = format!("{}/search/repositories", self.base_url);
        let per_page = per_page.clamp(1, 100).to_string();

        debug!(query, "searching GitHub repositories");

        with_retry(&self.retry_config, || async {
            let mut request = self
                .client
                .get(&url)
                .query(&[("q", query), ("per_page", per_page.as_str())]);

            if let Some(ref token) = self.token {
                request = request.bearer_auth(token);
            }

            let response = request.send().await?;
            let status = response.status();

            if status == reqwest::StatusCode::UNAUTHORIZED {
                return Err(GitHubError::AuthRequired);
            }

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS
                || (status == reqwest::StatusCode::FORBIDDEN && is_rate_limited(&response))
            {
                return Err(GitHubError::RateLimitExceeded);
            }

            if status == reqwest::StatusCode::UNPROCESSABLE_ENTITY {
                let body = response.text().await.unwrap_or_default();
                return Err(GitHubError::InvalidQuery(body));
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(GitHubError::RequestFailed { status, body });
            }

            let body = response.text().await?;
            let parsed: GitHubSearchResponse = serde_json::from_str(&body)?;
            Ok(parsed)
        })
        .await
    }
}

fn is_rate_limited(response: &reqwest::Response) -> bool {
    response
        .headers()
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == "0")
        .unwrap_or(false)
}
