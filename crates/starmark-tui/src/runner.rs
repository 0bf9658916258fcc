// TUI event loop and terminal management
use crate::{App, InputMode, StatusMessage};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io;
use tracing::{debug, info};

/// What a key press asks the loop to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Submit,
    Refresh,
    ToggleFavorite,
    OpenSelected,
    Quit,
}

pub async fn run_tui(mut app: App) -> anyhow::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app).await;

    // Restore terminal even if the loop failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> anyhow::Result<()> {
    info!("search screen opened");

    loop {
        terminal.draw(|f| crate::ui::render(f, app))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match handle_key(app, key) {
            Action::None => {}
            Action::Quit => app.quit(),
            Action::Submit => {
                let ticket = app.controller.begin_search();
                terminal.draw(|f| crate::ui::render(f, app))?;
                let result = app.controller.fetch(&ticket).await;
                app.controller.finish_search(ticket, result).await;
                app.sync_selection();
            }
            Action::Refresh => {
                let ticket = app.controller.begin_refresh();
                terminal.draw(|f| crate::ui::render(f, app))?;
                let result = app.controller.fetch(&ticket).await;
                app.controller.finish_search(ticket, result).await;
                app.sync_selection();
            }
            Action::ToggleFavorite => app.toggle_selected_favorite().await,
            Action::OpenSelected => {
                if let Some(repo) = app.selected_repository() {
                    let url = repo.repository.url.clone();
                    debug!(url = %url, "opening in browser");
                    if let Err(e) = open::that(&url) {
                        app.status_message =
                            Some(StatusMessage::error(format!("Failed to open browser: {}", e)));
                    }
                }
            }
        }

        if app.should_quit {
            info!("search screen closed");
            return Ok(());
        }
    }
}

/// Apply the synchronous part of a key press and report what else to do
pub fn handle_key(app: &mut App, key: KeyEvent) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Action::Quit;
    }
    if key.code == KeyCode::F(5) {
        return Action::Refresh;
    }

    match app.input_mode {
        InputMode::Searching => match key.code {
            KeyCode::Enter => {
                app.clear_status();
                app.enter_normal_mode();
                Action::Submit
            }
            KeyCode::Char(c) => {
                app.push_char(c);
                Action::None
            }
            KeyCode::Backspace => {
                app.pop_char();
                Action::None
            }
            KeyCode::Esc => {
                app.enter_normal_mode();
                Action::None
            }
            _ => Action::None,
        },
        InputMode::Normal => match key.code {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Char('/') | KeyCode::Char('i') => {
                app.enter_search_mode();
                Action::None
            }
            KeyCode::Char('j') | KeyCode::Down => {
                app.next_result();
                Action::None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                app.previous_result();
                Action::None
            }
            KeyCode::Char('f') | KeyCode::Char(' ') => Action::ToggleFavorite,
            KeyCode::Char('r') => Action::Refresh,
            KeyCode::Char('o') | KeyCode::Enter => Action::OpenSelected,
            _ => Action::None,
        },
    }
}
