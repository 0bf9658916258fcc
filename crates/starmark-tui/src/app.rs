// TUI application state
use ratatui::widgets::ListState;
use starmark_core::{AnnotatedRepository, ScreenState, SearchController, Theme};

/// What the screen gets from whoever opens it, instead of looking it up globally
#[derive(Debug, Clone)]
pub struct ScreenContext {
    pub title: String,
    pub theme: Theme,
}

impl Default for ScreenContext {
    fn default() -> Self {
        Self {
            title: "Search".to_string(),
            theme: Theme::default(),
        }
    }
}

/// One-line feedback shown in the status bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Searching, // Typing in the search box
    Normal,    // Navigating results
}

pub struct App {
    pub context: ScreenContext,
    pub controller: SearchController,
    pub input_mode: InputMode,
    pub list_state: ListState,
    pub status_message: Option<StatusMessage>,
    pub should_quit: bool,
    // Rows are keyed by repository id so selection survives a reload
    selected_id: Option<u64>,
}

impl App {
    pub fn new(context: ScreenContext, controller: SearchController) -> Self {
        Self {
            context,
            controller,
            input_mode: InputMode::Searching,
            list_state: ListState::default(),
            status_message: None,
            should_quit: false,
            selected_id: None,
        }
    }

    pub fn state(&self) -> &ScreenState {
        self.controller.state()
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn enter_search_mode(&mut self) {
        self.input_mode = InputMode::Searching;
    }

    pub fn enter_normal_mode(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn push_char(&mut self, c: char) {
        let mut text = self.state().query_text.clone();
        text.push(c);
        self.controller.set_query_text(text);
    }

    pub fn pop_char(&mut self) {
        let mut text = self.state().query_text.clone();
        text.pop();
        self.controller.set_query_text(text);
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.list_state.selected()
    }

    pub fn selected_repository(&self) -> Option<&AnnotatedRepository> {
        self.selected_index()
            .and_then(|i| self.state().results.get(i))
    }

    pub fn next_result(&mut self) {
        let len = self.state().results.len();
        if len == 0 {
            return;
        }
        let next = self.selected_index().map_or(0, |i| (i + 1).min(len - 1));
        self.select(next);
    }

    pub fn previous_result(&mut self) {
        if self.state().results.is_empty() {
            return;
        }
        let prev = self.selected_index().map_or(0, |i| i.saturating_sub(1));
        self.select(prev);
    }

    /// Re-point the selection after the results were replaced
    pub fn sync_selection(&mut self) {
        let results = &self.controller.state().results;
        let index = self
            .selected_id
            .and_then(|id| results.iter().position(|r| r.id() == id))
            .or(if results.is_empty() { None } else { Some(0) });

        match index {
            Some(i) => self.select(i),
            None => {
                self.list_state.select(None);
                self.selected_id = None;
            }
        }
    }

    fn select(&mut self, index: usize) {
        self.list_state.select(Some(index));
        self.selected_id = self.state().results.get(index).map(|r| r.id());
    }

    /// Flip the favorite flag of the selected row
    pub async fn toggle_selected_favorite(&mut self) {
        let Some(selected) = self.selected_repository() else {
            return;
        };
        let repository = selected.repository.clone();
        let new_is_favorite = !selected.is_favorite;

        if self.controller.toggle_favorite(&repository, new_is_favorite).await {
            self.status_message = Some(StatusMessage::info(if new_is_favorite {
                format!("Added {} to favorites", repository.full_name)
            } else {
                format!("Removed {} from favorites", repository.full_name)
            }));
        } else {
            self.status_message = Some(StatusMessage::error(format!(
                "Could not update {}",
                repository.full_name
            )));
        }
        self.sync_selection();
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use starmark_core::{
        Error, FavoriteKeySet, FavoriteRepository, RepositorySummary, Result, SearchController,
        SearchProvider,
    };

    use super::{App, ScreenContext};

    pub struct StaticSearch(pub Vec<RepositorySummary>);

    #[async_trait]
    impl SearchProvider for StaticSearch {
        async fn search(&self, _query: &str) -> Result<Vec<RepositorySummary>> {
            Ok(self.0.clone())
        }
    }

    #[derive(Default)]
    pub struct MemoryFavorites(pub Mutex<FavoriteKeySet>);

    #[async_trait]
    impl FavoriteRepository for MemoryFavorites {
        async fn favorite_keys(&self) -> Result<Option<FavoriteKeySet>> {
            Ok(Some(self.0.lock().unwrap().clone()))
        }

        async fn save_item(&self, id: &str, _serialized_item: &str) -> Result<()> {
            self.0.lock().unwrap().insert(id.to_string());
            Ok(())
        }

        async fn remove_item(&self, id: &str) -> Result<()> {
            self.0.lock().unwrap().remove(id);
            Ok(())
        }
    }

    fn read_only() -> Error {
        std::io::Error::new(std::io::ErrorKind::PermissionDenied, "database is read-only").into()
    }

    /// Reads work, every write is rejected
    pub struct ReadOnlyFavorites;

    #[async_trait]
    impl FavoriteRepository for ReadOnlyFavorites {
        async fn favorite_keys(&self) -> Result<Option<FavoriteKeySet>> {
            Ok(Some(FavoriteKeySet::new()))
        }

        async fn save_item(&self, _id: &str, _serialized_item: &str) -> Result<()> {
            Err(read_only())
        }

        async fn remove_item(&self, _id: &str) -> Result<()> {
            Err(read_only())
        }
    }

    pub fn repo(id: u64, name: &str) -> RepositorySummary {
        RepositorySummary {
            id,
            name: name.to_string(),
            full_name: format!("owner/{}", name),
            description: Some(format!("The {} project", name)),
            owner: "owner".to_string(),
            stars: 1500,
            forks: 12,
            language: Some("Rust".to_string()),
            url: format!("https://github.com/owner/{}", name),
            updated_at: None,
        }
    }

    pub fn app_with(results: Vec<RepositorySummary>) -> App {
        let controller = SearchController::new(
            Arc::new(StaticSearch(results)),
            Arc::new(MemoryFavorites::default()),
        );
        App::new(ScreenContext::default(), controller)
    }

    pub fn read_only_app_with(results: Vec<RepositorySummary>) -> App {
        let controller =
            SearchController::new(Arc::new(StaticSearch(results)), Arc::new(ReadOnlyFavorites));
        App::new(ScreenContext::default(), controller)
    }
}
