// SQLite-backed favorites store
// A flat key/value table: favorite key -> serialized repository

pub mod favorites;

pub use favorites::{FavoriteKind, FavoriteStore, FavoriteStoreError, StoredFavorite};
