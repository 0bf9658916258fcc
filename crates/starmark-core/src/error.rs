use thiserror::Error;

/// Everything that can go wrong below the screen
///
/// The controller logs these and moves on; they only escape through
/// the lower-level APIs and the CLI.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Search request failed: {0}")]
    SearchError(#[from] starmark_api::GitHubError),

    #[error("Favorites store failed: {0}")]
    FavoritesError(#[from] starmark_cache::FavoriteStoreError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Background task failed: {0}")]
    TaskError(String),
}
