use crate::{models::RepositorySummary, Result};

/// The remote repository search the screen talks to.
///
/// Kept as a trait so the controller can be driven by a mock in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    /// Free-text search. The query is forwarded as-is, empty included.
    async fn search(&self, query: &str) -> Result<Vec<RepositorySummary>>;
}
