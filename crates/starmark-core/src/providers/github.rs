// GitHub provider implementation - bridges API client with SearchProvider trait
use async_trait::async_trait;
use starmark_api::{GitHubClient, GitHubRepo};

use crate::{models::RepositorySummary, search::SearchProvider, Result};

/// Wrapper around GitHubClient that implements SearchProvider
pub struct GitHubProvider {
    client: GitHubClient,
    per_page: u32,
}

impl GitHubProvider {
    pub fn new(client: GitHubClient, per_page: u32) -> Self {
        Self { client, per_page }
    }
}

#[async_trait]
impl SearchProvider for GitHubProvider {
    async fn search(&self, query: &str) -> Result<Vec<RepositorySummary>> {
        let response = self
            .client
            .search_repositories(query, self.per_page)
            .await?;

        if response.incomplete_results {
            tracing::debug!(query, "GitHub reported incomplete results");
        }

        Ok(response.items.into_iter().map(github_to_summary).collect())
    }
}

/// Convert a GitHub search hit to our internal model
fn github_to_summary(gh: GitHubRepo) -> RepositorySummary {
    RepositorySummary {
        id: gh.id,
        name: gh.name,
        full_name: gh.full_name,
        description: gh.description,
        owner: gh.owner.login,
        stars: gh.stargazers_count,
        forks: gh.forks_count,
        language: gh.language,
        url: gh.html_url,
        updated_at: gh.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use starmark_api::GitHubOwner;

    #[test]
    fn test_github_to_summary() {
        let gh = GitHubRepo {
            id: 42,
            name: "answer".to_string(),
            full_name: "deep/answer".to_string(),
            owner: GitHubOwner {
                login: "deep".to_string(),
                avatar_url: None,
            },
            description: Some("Life, the universe and everything".to_string()),
            html_url: "https://github.com/deep/answer".to_string(),
            stargazers_count: 4200,
            forks_count: 42,
            language: Some("Rust".to_string()),
            updated_at: None,
        };

        let summary = github_to_summary(gh);
        assert_eq!(summary.id, 42);
        assert_eq!(summary.owner, "deep");
        assert_eq!(summary.stars, 4200);
        assert_eq!(summary.url, "https://github.com/deep/answer");
        assert_eq!(summary.favorite_key(), "42");
    }
}
