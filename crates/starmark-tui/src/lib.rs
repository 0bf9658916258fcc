// Terminal UI for the search screen

pub mod app;
pub mod runner;
pub mod ui;

pub use app::{App, InputMode, ScreenContext, StatusMessage};
pub use runner::{handle_key, run_tui, Action};
