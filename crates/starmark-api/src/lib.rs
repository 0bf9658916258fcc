// HTTP client for the repository search service
pub mod github;
pub mod retry;

pub use github::{GitHubClient, GitHubError, GitHubOwner, GitHubRepo, GitHubSearchResponse};
pub use retry::{RetryConfig, Retryable};
