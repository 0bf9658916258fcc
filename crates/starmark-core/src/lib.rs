// Screen logic: models, favorite merging and the search controller
pub mod config;
pub mod controller;
pub mod error;
pub mod favorites;
pub mod models;
pub mod providers;
pub mod search;
pub mod theme;

pub use config::Config;
pub use controller::{Phase, ScreenState, SearchController, SearchTicket};
pub use error::Error;
pub use favorites::{merge, FavoriteKeySet, FavoriteRepository, SqliteFavorites};
pub use models::{AnnotatedRepository, RepositorySummary};
pub use search::SearchProvider;
pub use theme::Theme;

/// Result type alias because typing Result<T, Error> everywhere is tedious
pub type Result<T> = std::result::Result<T, Error>;
