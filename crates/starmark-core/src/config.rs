use serde::{Deserialize, Serialize};
use starmark_cache::FavoriteKind;
use std::path::{Path, PathBuf};

use crate::{theme::Theme, Error};

/// Main configuration structure
///
/// Loaded from `<config dir>/starmark/config.toml`. Missing file or missing
/// sections fall back to defaults; the CLI overrides on top.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub github: GitHubConfig,
    pub favorites: FavoritesConfig,
    pub ui: UiConfig,
}

impl Config {
    /// Load config from the default location, or defaults if there is none
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| Error::ConfigError(format!("Failed to parse {}: {}", path.display(), e)))
    }

    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn config_path() -> crate::Result<PathBuf> {
        let dir = dirs::config_dir()
            .ok_or_else(|| Error::ConfigError("Could not find config directory".into()))?;
        Ok(dir.join("starmark").join("config.toml"))
    }

    /// Where favorites and logs go unless configured otherwise
    pub fn data_dir() -> crate::Result<PathBuf> {
        let dir = dirs::data_dir()
            .ok_or_else(|| Error::ConfigError("Could not find data directory".into()))?;
        Ok(dir.join("starmark"))
    }

    pub fn favorites_db_path(&self) -> crate::Result<PathBuf> {
        match &self.favorites.db_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::data_dir()?.join("favorites.db")),
        }
    }

    /// Configured theme, falling back to the default for unknown names
    pub fn theme(&self) -> Theme {
        Theme::by_name(&self.ui.theme).unwrap_or_else(|| {
            tracing::warn!(theme = %self.ui.theme, "unknown theme, using default");
            Theme::default()
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GitHubConfig {
    /// Personal access token; raises the search rate limit
    pub token: Option<String>,

    /// API URL (for GitHub Enterprise)
    pub api_url: String,

    /// Results per search, 1..=100
    pub per_page: u32,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: "https://api.github.com".to_string(),
            per_page: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct FavoritesConfig {
    /// Defaults to `<data dir>/starmark/favorites.db`
    pub db_path: Option<PathBuf>,
    pub kind: FavoriteKind,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    /// Default Dark, Light, Nord, Dracula, Gruvbox Dark
    pub theme: String,
    pub title: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: "Default Dark".to_string(),
            title: "Search".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.github.per_page, 30);
        assert_eq!(config.github.api_url, "https://api.github.com");
        assert_eq!(config.favorites.kind, FavoriteKind::Popular);
        assert_eq!(config.ui.theme, "Default Dark");
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[ui]\ntheme = \"nord\"\n\n[favorites]\nkind = \"trending\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.ui.theme, "nord");
        assert_eq!(config.ui.title, "Search");
        assert_eq!(config.favorites.kind, FavoriteKind::Trending);
        assert_eq!(config.github.per_page, 30);
        assert_eq!(config.theme().name, "Nord");
    }

    #[test]
    fn test_bad_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[github\nper_page = ").unwrap();

        assert!(matches!(Config::load_from(&path), Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sub").join("config.toml");

        let mut config = Config::default();
        config.github.per_page = 50;
        config.favorites.db_path = Some(dir.path().join("fav.db"));
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.favorites_db_path().unwrap(), dir.path().join("fav.db"));
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        let mut config = Config::default();
        config.ui.theme = "does-not-exist".to_string();
        assert_eq!(config.theme(), Theme::default());
    }
}
