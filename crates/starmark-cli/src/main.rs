use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use starmark_api::{GitHubClient, RetryConfig};
use starmark_cache::FavoriteKind;
use starmark_core::{
    providers::GitHubProvider, Config, SearchController, SqliteFavorites, Theme,
};
use starmark_tui::{App, ScreenContext};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "starmark")]
#[command(version, about = "Search GitHub repositories and keep favorites", long_about = None)]
struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// GitHub token; raises the search rate limit
    #[arg(long, env = "GITHUB_TOKEN", global = true, hide_env_values = true)]
    token: Option<String>,

    /// Favorites database file
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Color theme for the screen
    #[arg(long, global = true)]
    theme: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Run one search and print results with favorite markers
    Search {
        /// Search query, passed to GitHub as-is
        query: String,
    },
    /// List saved favorites
    Favorites {
        /// Which favorites set to read
        #[arg(long, value_enum, default_value_t = KindArg::Popular)]
        kind: KindArg,
    },
    /// List available themes
    Themes,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum KindArg {
    Popular,
    Trending,
}

impl From<KindArg> for FavoriteKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Popular => FavoriteKind::Popular,
            KindArg::Trending => FavoriteKind::Trending,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(token) = cli.token.clone() {
        config.github.token = Some(token);
    }
    if let Some(db) = cli.db.clone() {
        config.favorites.db_path = Some(db);
    }
    if let Some(theme) = cli.theme.clone() {
        config.ui.theme = theme;
    }

    let interactive = cli.command.is_none();
    init_logging(interactive)?;

    match cli.command {
        None => run_screen(&config).await,
        Some(Commands::Search { query }) => run_search(&config, query).await,
        Some(Commands::Favorites { kind }) => list_favorites(&config, kind.into()).await,
        Some(Commands::Themes) => {
            for theme in Theme::all_themes() {
                println!("{}", theme.name);
            }
            Ok(())
        }
    }
}

/// Logs go to stderr for one-shot commands, and to a file while the
/// TUI owns the terminal.
fn init_logging(interactive: bool) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "starmark=info,starmark_core=info,starmark_tui=info".into());

    if interactive {
        let dir = Config::data_dir()?;
        std::fs::create_dir_all(&dir)?;
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join("starmark.log"))
            .context("opening log file")?;

        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(std::sync::Mutex::new(file)),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
    Ok(())
}

fn build_controller(config: &Config, retry: RetryConfig) -> anyhow::Result<SearchController> {
    let client = GitHubClient::with_base_url(
        config.github.token.clone(),
        config.github.api_url.clone(),
    )?
    .with_retry_config(retry);
    let provider = GitHubProvider::new(client, config.github.per_page);

    let db_path = config.favorites_db_path()?;
    let favorites = SqliteFavorites::open(&db_path, config.favorites.kind)
        .with_context(|| format!("opening favorites at {}", db_path.display()))?;

    Ok(SearchController::new(Arc::new(provider), Arc::new(favorites)))
}

async fn run_screen(config: &Config) -> anyhow::Result<()> {
    let controller = build_controller(config, RetryConfig::default())?;
    let context = ScreenContext {
        title: config.ui.title.clone(),
        theme: config.theme(),
    };
    starmark_tui::run_tui(App::new(context, controller)).await
}

async fn run_search(config: &Config, query: String) -> anyhow::Result<()> {
    // One shot: fail fast instead of backing off behind a silent prompt
    let mut controller = build_controller(config, RetryConfig::no_retry())?;
    tracing::info!("Searching for: {}", query);

    controller.set_query_text(query);
    controller.submit_search().await;

    let results = &controller.state().results;
    if results.is_empty() {
        println!("No results.");
    }
    for row in results {
        let repo = &row.repository;
        println!(
            "{} {:>7}  {}  {}",
            if row.is_favorite { "*" } else { " " },
            repo.stars,
            repo.full_name,
            repo.description.as_deref().unwrap_or("")
        );
    }
    Ok(())
}

async fn list_favorites(config: &Config, kind: FavoriteKind) -> anyhow::Result<()> {
    let db_path = config.favorites_db_path()?;
    let favorites = SqliteFavorites::open(&db_path, kind)?;

    let items = favorites.items().await?;
    if items.is_empty() {
        println!("No {} favorites yet.", kind);
    }
    for repo in items {
        println!("{:>12}  {}  {}", repo.id, repo.full_name, repo.url);
    }
    Ok(())
}
