// Favorite keys: the storage seam and the merge step
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use starmark_cache::{FavoriteKind, FavoriteStore};

use crate::{
    models::{AnnotatedRepository, RepositorySummary},
    Error, Result,
};

/// Stringified repository ids the user has favorited
pub type FavoriteKeySet = HashSet<String>;

/// Where favorites live.
///
/// Writes are awaited; once the future resolves the change is durable and
/// the next `favorite_keys` call reflects it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    /// All keys, or `None` if nothing has ever been stored
    async fn favorite_keys(&self) -> Result<Option<FavoriteKeySet>>;
    async fn save_item(&self, id: &str, serialized_item: &str) -> Result<()>;
    async fn remove_item(&self, id: &str) -> Result<()>;
}

/// Annotate results with favorite membership.
///
/// Keeps order and length; an id is favorite iff its string form is in `keys`.
pub fn merge(results: &[RepositorySummary], keys: &FavoriteKeySet) -> Vec<AnnotatedRepository> {
    results
        .iter()
        .map(|repo| AnnotatedRepository {
            is_favorite: keys.contains(&repo.favorite_key()),
            repository: repo.clone(),
        })
        .collect()
}

/// [`FavoriteRepository`] backed by the SQLite store.
///
/// rusqlite connections are blocking and not `Sync`, so calls hop onto
/// the blocking pool behind a mutex.
#[derive(Clone)]
pub struct SqliteFavorites {
    store: Arc<Mutex<FavoriteStore>>,
}

impl SqliteFavorites {
    pub fn new(store: FavoriteStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }

    pub fn open(path: impl AsRef<std::path::Path>, kind: FavoriteKind) -> Result<Self> {
        Ok(Self::new(FavoriteStore::open(path, kind)?))
    }

    /// Saved items decoded back into repositories. Undecodable rows are skipped.
    pub async fn items(&self) -> Result<Vec<RepositorySummary>> {
        let stored = self.with_store(|store| store.items()).await?;
        Ok(stored
            .into_iter()
            .filter_map(|item| match serde_json::from_str(&item.data) {
                Ok(repo) => Some(repo),
                Err(e) => {
                    tracing::warn!(key = %item.key, "skipping unreadable favorite: {}", e);
                    None
                }
            })
            .collect())
    }

    async fn with_store<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&FavoriteStore) -> starmark_cache::favorites::Result<T> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || {
            let guard = store
                .lock()
                .map_err(|_| Error::TaskError("favorites store lock poisoned".into()))?;
            op(&guard).map_err(Error::from)
        })
        .await
        .map_err(|e| Error::TaskError(e.to_string()))?
    }
}

#[async_trait]
impl FavoriteRepository for SqliteFavorites {
    async fn favorite_keys(&self) -> Result<Option<FavoriteKeySet>> {
        let keys = self.with_store(|store| store.keys()).await?;
        Ok(if keys.is_empty() { None } else { Some(keys) })
    }

    async fn save_item(&self, id: &str, serialized_item: &str) -> Result<()> {
        let id = id.to_string();
        let data = serialized_item.to_string();
        self.with_store(move |store| store.save(&id, &data)).await
    }

    async fn remove_item(&self, id: &str) -> Result<()> {
        let id = id.to_string();
        self.with_store(move |store| store.remove(&id).map(|_| ()))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample_repo;

    fn keys(ids: &[&str]) -> FavoriteKeySet {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_merge_marks_exactly_the_favorited_ids() {
        let results: Vec<_> = (1..=5).map(sample_repo).collect();
        let merged = merge(&results, &keys(&["2", "4", "999"]));

        assert_eq!(merged.len(), results.len());
        for (annotated, original) in merged.iter().zip(&results) {
            assert_eq!(&annotated.repository, original);
            assert_eq!(
                annotated.is_favorite,
                original.id == 2 || original.id == 4,
                "id {}",
                original.id
            );
        }
    }

    #[test]
    fn test_merge_react_scenario() {
        let merged = merge(&[sample_repo(1)], &keys(&["1"]));
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].id(), 1);
        assert!(merged[0].is_favorite);
    }

    #[test]
    fn test_merge_empty_inputs() {
        assert!(merge(&[], &keys(&["1"])).is_empty());

        let merged = merge(&[sample_repo(3), sample_repo(1)], &FavoriteKeySet::new());
        assert!(merged.iter().all(|r| !r.is_favorite));
        assert_eq!(merged[0].id(), 3);
        assert_eq!(merged[1].id(), 1);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let results = vec![sample_repo(10), sample_repo(20)];
        let k = keys(&["20"]);
        assert_eq!(merge(&results, &k), merge(&results, &k));
    }

    #[test]
    fn test_merge_does_not_match_on_prefix() {
        let merged = merge(&[sample_repo(4), sample_repo(42)], &keys(&["4"]));
        assert!(merged[0].is_favorite);
        assert!(!merged[1].is_favorite);
    }

    #[tokio::test]
    async fn test_sqlite_favorites_round_trip() {
        let store = FavoriteStore::open_in_memory(FavoriteKind::Popular).unwrap();
        let favorites = SqliteFavorites::new(store);

        assert_eq!(favorites.favorite_keys().await.unwrap(), None);

        let repo = sample_repo(42);
        let json = serde_json::to_string(&repo).unwrap();
        favorites.save_item("42", &json).await.unwrap();

        assert_eq!(favorites.favorite_keys().await.unwrap(), Some(keys(&["42"])));
        assert_eq!(favorites.items().await.unwrap(), vec![repo]);

        favorites.remove_item("42").await.unwrap();
        assert_eq!(favorites.favorite_keys().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_items_skips_garbage_rows() {
        let store = FavoriteStore::open_in_memory(FavoriteKind::Popular).unwrap();
        let favorites = SqliteFavorites::new(store);

        favorites.save_item("1", "not json").await.unwrap();
        favorites
            .save_item("2", &serde_json::to_string(&sample_repo(2)).unwrap())
            .await
            .unwrap();

        let items = favorites.items().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, 2);
    }
}
