// Search screen controller
//
// Owns the screen state and sequences the two collaborators:
// search first, then favorite keys, then merge.
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{
    favorites::{merge, FavoriteKeySet, FavoriteRepository},
    models::{AnnotatedRepository, RepositorySummary},
    search::SearchProvider,
    Result,
};

/// Where the controller is in the search pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    MergingFavorites,
}

/// Everything the renderer needs. Replaced as a whole on every transition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScreenState {
    pub query_text: String,
    pub is_loading: bool,
    pub results: Vec<AnnotatedRepository>,
}

/// Handle for one issued search. Only the newest ticket may land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    seq: u64,
    query: String,
}

impl SearchTicket {
    pub fn query(&self) -> &str {
        &self.query
    }
}

pub struct SearchController {
    search: Arc<dyn SearchProvider>,
    favorites: Arc<dyn FavoriteRepository>,
    state: ScreenState,
    phase: Phase,
    raw_results: Vec<RepositorySummary>,
    favorite_keys: FavoriteKeySet,
    last_query: Option<String>,
    issued: u64,
    published: watch::Sender<ScreenState>,
}

impl SearchController {
    pub fn new(search: Arc<dyn SearchProvider>, favorites: Arc<dyn FavoriteRepository>) -> Self {
        Self {
            search,
            favorites,
            state: ScreenState::default(),
            phase: Phase::Idle,
            raw_results: Vec::new(),
            favorite_keys: FavoriteKeySet::new(),
            last_query: None,
            issued: 0,
            published: watch::Sender::new(ScreenState::default()),
        }
    }

    /// Follow every state the controller commits, including the ones that
    /// only live for the duration of an await inside a single operation.
    pub fn subscribe(&self) -> watch::Receiver<ScreenState> {
        self.published.subscribe()
    }

    pub fn state(&self) -> &ScreenState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn favorite_keys(&self) -> &FavoriteKeySet {
        &self.favorite_keys
    }

    pub fn last_query(&self) -> Option<&str> {
        self.last_query.as_deref()
    }

    /// Update the query text. Never searches.
    pub fn set_query_text(&mut self, text: impl Into<String>) {
        let next = ScreenState {
            query_text: text.into(),
            ..self.state.clone()
        };
        self.commit(next);
    }

    /// Search with the current query text and merge favorites into the result
    pub async fn submit_search(&mut self) {
        let ticket = self.begin_search();
        let result = self.fetch(&ticket).await;
        self.finish_search(ticket, result).await;
    }

    /// Re-issue the last submitted search (pull-to-refresh)
    pub async fn refresh(&mut self) {
        let ticket = self.begin_refresh();
        let result = self.fetch(&ticket).await;
        self.finish_search(ticket, result).await;
    }

    /// First half of [`submit_search`](Self::submit_search): flips the
    /// loading flag and hands back the ticket to fetch with. Lets a UI draw
    /// the loading frame before awaiting.
    pub fn begin_search(&mut self) -> SearchTicket {
        let query = self.state.query_text.clone();
        self.start(query, true)
    }

    /// Like [`begin_search`](Self::begin_search) but for the last submitted query
    pub fn begin_refresh(&mut self) -> SearchTicket {
        let query = self.reload_query();
        self.start(query, true)
    }

    /// Run the search for a ticket. Does not touch state.
    pub async fn fetch(&self, ticket: &SearchTicket) -> Result<Vec<RepositorySummary>> {
        self.search.search(ticket.query()).await
    }

    /// Second half: store results (or log the failure) and merge favorites.
    /// Returns false if the ticket was superseded and the result dropped.
    pub async fn finish_search(
        &mut self,
        ticket: SearchTicket,
        result: Result<Vec<RepositorySummary>>,
    ) -> bool {
        if ticket.seq != self.issued {
            debug!(
                query = ticket.query(),
                seq = ticket.seq,
                latest = self.issued,
                "dropping superseded search result"
            );
            return false;
        }

        match result {
            Ok(items) => {
                info!(query = ticket.query(), count = items.len(), "search finished");
                self.raw_results = items;
                self.phase = Phase::MergingFavorites;
                self.refresh_favorite_state().await;
            }
            Err(e) => {
                warn!(query = ticket.query(), "search failed: {}", e);
                self.phase = Phase::Idle;
                let next = ScreenState {
                    is_loading: false,
                    ..self.state.clone()
                };
                self.commit(next);
            }
        }
        true
    }

    /// Re-read favorite keys and re-merge. A failed read counts as "nothing favorited".
    pub async fn refresh_favorite_state(&mut self) {
        self.favorite_keys = match self.favorites.favorite_keys().await {
            Ok(keys) => keys.unwrap_or_default(),
            Err(e) => {
                warn!("could not read favorite keys: {}", e);
                FavoriteKeySet::new()
            }
        };
        self.phase = Phase::Idle;
        self.remerge(false);
    }

    /// Persist the new favorite flag for `item`, then reload the results.
    ///
    /// The row flips as soon as the write is confirmed. If the write fails
    /// nothing changes and no reload happens. Returns whether the write landed.
    pub async fn toggle_favorite(&mut self, item: &RepositorySummary, new_is_favorite: bool) -> bool {
        let key = item.favorite_key();

        let written = if new_is_favorite {
            match serde_json::to_string(item) {
                Ok(serialized) => self.favorites.save_item(&key, &serialized).await,
                Err(e) => Err(e.into()),
            }
        } else {
            self.favorites.remove_item(&key).await
        };

        if let Err(e) = written {
            warn!(key = %key, favorite = new_is_favorite, "favorite write failed: {}", e);
            return false;
        }

        debug!(key = %key, favorite = new_is_favorite, "favorite written");
        if new_is_favorite {
            self.favorite_keys.insert(key);
        } else {
            self.favorite_keys.remove(&key);
        }
        let loading = self.state.is_loading;
        self.remerge(loading);

        self.reload().await;
        true
    }

    /// Silent re-run of the last search: no loading indicator
    pub async fn reload(&mut self) {
        let query = self.reload_query();
        let ticket = self.start(query, false);
        let result = self.fetch(&ticket).await;
        self.finish_search(ticket, result).await;
    }

    fn reload_query(&self) -> String {
        self.last_query
            .clone()
            .unwrap_or_else(|| self.state.query_text.clone())
    }

    fn start(&mut self, query: String, show_loading: bool) -> SearchTicket {
        self.issued += 1;
        self.last_query = Some(query.clone());
        if show_loading {
            self.phase = Phase::Loading;
            let next = ScreenState {
                is_loading: true,
                ..self.state.clone()
            };
            self.commit(next);
        }
        debug!(query = %query, seq = self.issued, "search issued");
        SearchTicket {
            seq: self.issued,
            query,
        }
    }

    fn remerge(&mut self, is_loading: bool) {
        let next = ScreenState {
            query_text: self.state.query_text.clone(),
            is_loading,
            results: merge(&self.raw_results, &self.favorite_keys),
        };
        self.commit(next);
    }

    fn commit(&mut self, next: ScreenState) {
        self.published.send_replace(next.clone());
        self.state = next;
    }
}
