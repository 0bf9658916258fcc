use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One search hit, as the screen sees it.
///
/// Only `id` matters to the favorites logic; the rest is for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositorySummary {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub owner: String,
    pub stars: u32,
    pub forks: u32,
    pub language: Option<String>,
    pub url: String,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl RepositorySummary {
    /// Key used by the favorites store
    pub fn favorite_key(&self) -> String {
        self.id.to_string()
    }
}

/// A search result plus whether the user has favorited it.
/// Derived on every merge, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedRepository {
    pub repository: RepositorySummary,
    pub is_favorite: bool,
}

impl AnnotatedRepository {
    pub fn id(&self) -> u64 {
        self.repository.id
    }
}

#[cfg(test)]
pub(crate) fn sample_repo(id: u64) -> RepositorySummary {
    RepositorySummary {
        id,
        name: format!("repo-{}", id),
        full_name: format!("owner/repo-{}", id),
        description: Some(format!("Repository number {}", id)),
        owner: "owner".to_string(),
        stars: (id as u32) * 10,
        forks: id as u32,
        language: Some("Rust".to_string()),
        url: format!("https://github.com/owner/repo-{}", id),
        updated_at: None,
    }
}
