// UI rendering logic
use crate::{App, InputMode};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};
use starmark_core::{theme::ThemeColors, AnnotatedRepository};

pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Search input + submit
            Constraint::Min(3),    // Results
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_search_input(frame, app, chunks[1]);
    render_results_list(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);
}

/// Convert a theme color into a terminal color
pub fn to_color(c: starmark_core::theme::Color) -> Color {
    Color::Rgb(c.r, c.g, c.b)
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let colors = &app.context.theme.colors;
    let header_style = Style::default()
        .bg(to_color(colors.header))
        .fg(to_color(colors.header_text));

    let title = Paragraph::new(Line::from(Span::styled(
        app.context.title.as_str(),
        header_style.add_modifier(Modifier::BOLD),
    )))
    .style(header_style)
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).border_style(header_style));

    frame.render_widget(title, area);
}

fn render_search_input(frame: &mut Frame, app: &App, area: Rect) {
    let colors = &app.context.theme.colors;
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(12)])
        .split(area);

    let border = if app.input_mode == InputMode::Searching {
        to_color(colors.border_focused)
    } else {
        to_color(colors.border)
    };

    let query = app.state().query_text.as_str();
    let input = Paragraph::new(query)
        .style(Style::default().fg(to_color(colors.foreground)))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Query (Enter to search) ")
                .border_style(Style::default().fg(border)),
        );
    frame.render_widget(input, chunks[0]);

    let submit_style = Style::default()
        .bg(to_color(colors.header))
        .fg(to_color(colors.header_text))
        .add_modifier(Modifier::BOLD);
    let submit = Paragraph::new(app.context.title.as_str())
        .style(submit_style)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(submit_style));
    frame.render_widget(submit, chunks[1]);

    if app.input_mode == InputMode::Searching {
        let width = u16::try_from(query.chars().count()).unwrap_or(u16::MAX);
        frame.set_cursor_position((
            chunks[0]
                .x
                .saturating_add(width)
                .saturating_add(1)
                .min(chunks[0].right().saturating_sub(2)),
            chunks[0].y.saturating_add(1),
        ));
    }
}

fn render_results_list(frame: &mut Frame, app: &mut App, area: Rect) {
    let colors = app.context.theme.colors.clone();

    if app.state().is_loading {
        let loading = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Searching...",
                Style::default()
                    .fg(to_color(colors.info))
                    .add_modifier(Modifier::BOLD),
            )),
        ];
        let paragraph = Paragraph::new(loading)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(" Results "));
        frame.render_widget(paragraph, area);
        return;
    }

    let results = &app.controller.state().results;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(to_color(colors.border)))
        .title(format!(" Results ({}) ", results.len()));

    if results.is_empty() {
        let hint = Paragraph::new(Line::from(Span::styled(
            "No results. Type a query and press Enter.",
            Style::default().fg(to_color(colors.muted)),
        )))
        .alignment(Alignment::Center)
        .block(block);
        frame.render_widget(hint, area);
        return;
    }

    let desc_width = area.width.saturating_sub(8) as usize;
    let items: Vec<ListItem> = results
        .iter()
        .map(|repo| repository_row(repo, &colors, desc_width))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(to_color(colors.selected_bg))
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

/// One row of the result list
pub fn repository_row<'a>(
    repo: &'a AnnotatedRepository,
    colors: &ThemeColors,
    desc_width: usize,
) -> ListItem<'a> {
    let summary = &repo.repository;

    let marker = if repo.is_favorite {
        Span::styled("♥ ", Style::default().fg(to_color(colors.favorite)))
    } else {
        Span::styled("♡ ", Style::default().fg(to_color(colors.muted)))
    };

    let line1 = Line::from(vec![
        marker,
        Span::styled(
            format!("★{} ", format_number(summary.stars)),
            Style::default().fg(to_color(colors.stars)),
        ),
        Span::styled(
            summary.full_name.as_str(),
            Style::default()
                .fg(to_color(colors.selected))
                .add_modifier(Modifier::BOLD),
        ),
    ]);

    let line2 = Line::from(vec![
        Span::raw("   "),
        Span::styled(
            summary.language.as_deref().unwrap_or("Unknown"),
            Style::default().fg(to_color(colors.language)),
        ),
        Span::styled("  •  ", Style::default().fg(to_color(colors.muted))),
        Span::styled(
            format!("⑂{}", format_number(summary.forks)),
            Style::default().fg(to_color(colors.forks)),
        ),
        Span::styled("  •  ", Style::default().fg(to_color(colors.muted))),
        Span::styled(
            format!("@{}", summary.owner),
            Style::default().fg(to_color(colors.muted)),
        ),
    ]);

    let description = truncate(
        summary.description.as_deref().unwrap_or("No description"),
        desc_width,
    );
    let line3 = Line::from(Span::styled(
        format!("   {}", description),
        Style::default().fg(to_color(colors.foreground)),
    ));

    ListItem::new(vec![line1, line2, line3])
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let colors = &app.context.theme.colors;

    let hints = match app.input_mode {
        InputMode::Searching => "Enter search  Esc results  Ctrl-C quit",
        InputMode::Normal => "j/k move  f favorite  r refresh  o open  / search  q quit",
    };

    let line = match &app.status_message {
        Some(msg) => Line::from(vec![
            Span::styled(
                msg.text.as_str(),
                Style::default().fg(to_color(if msg.is_error {
                    colors.error
                } else {
                    colors.info
                })),
            ),
            Span::raw("  |  "),
            Span::styled(hints, Style::default().fg(to_color(colors.muted))),
        ]),
        None => Line::from(Span::styled(hints, Style::default().fg(to_color(colors.muted)))),
    };

    frame.render_widget(Paragraph::new(line), area);
}

/// 1234 -> "1.2k", 2_500_000 -> "2.5M"
pub fn format_number(num: u32) -> String {
    if num >= 1_000_000 {
        format!("{:.1}M", num as f64 / 1_000_000.0)
    } else if num >= 1_000 {
        format!("{:.1}k", num as f64 / 1_000.0)
    } else {
        num.to_string()
    }
}

/// Cut at a char boundary and add an ellipsis when over `max` chars
fn truncate(text: &str, max: usize) -> String {
    if max < 4 || text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max - 3).collect();
    format!("{}...", cut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::{app_with, read_only_app_with, repo};
    use crate::StatusMessage;
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1500), "1.5k");
        assert_eq!(format_number(2_500_000), "2.5M");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ééééééééééé", 6), "ééé...");
    }

    #[test]
    fn test_header_shows_title() {
        let mut app = app_with(vec![]);
        app.context.title = "Find Repos".to_string();
        let screen = draw(&mut app);
        assert!(screen.contains("Find Repos"));
        assert!(screen.contains("No results"));
    }

    #[test]
    fn test_loading_indicator_replaces_list() {
        let mut app = app_with(vec![]);
        let _ticket = app.controller.begin_search();
        let screen = draw(&mut app);
        assert!(screen.contains("Searching..."));
        assert!(!screen.contains("No results"));
    }

    #[test]
    fn test_cursor_stays_inside_input_for_huge_query() {
        let mut app = app_with(vec![]);
        app.controller.set_query_text("x".repeat(70_000));

        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|f| render(f, &mut app)).unwrap();

        let cursor = terminal.get_cursor_position().unwrap();
        assert!(cursor.x < 80 - 12);
        assert_eq!(cursor.y, 4);
    }

    fn status_bar_fg(app: &mut App) -> Color {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        terminal.backend().buffer().cell((0, 19)).unwrap().fg
    }

    #[test]
    fn test_status_colors_follow_severity() {
        let mut app = app_with(vec![]);
        let colors = app.context.theme.colors.clone();

        app.status_message = Some(StatusMessage::info("Added owner/a to favorites"));
        assert_eq!(status_bar_fg(&mut app), to_color(colors.info));

        app.status_message = Some(StatusMessage::error("Could not update owner/a"));
        assert_eq!(status_bar_fg(&mut app), to_color(colors.error));
    }

    #[tokio::test]
    async fn test_failed_toggle_renders_in_error_color() {
        let mut app = read_only_app_with(vec![repo(3, "gamma")]);
        app.controller.submit_search().await;
        app.sync_selection();
        app.toggle_selected_favorite().await;

        let error = to_color(app.context.theme.colors.error);
        assert_eq!(status_bar_fg(&mut app), error);
        assert!(draw(&mut app).contains("Could not update owner/gamma"));
    }

    #[tokio::test]
    async fn test_rows_show_favorite_marker() {
        let mut app = app_with(vec![repo(1, "alpha"), repo(2, "beta")]);
        app.controller.submit_search().await;
        app.sync_selection();
        app.next_result();
        app.toggle_selected_favorite().await;

        let screen = draw(&mut app);
        assert!(screen.contains("Results (2)"));
        assert!(screen.contains("owner/alpha"));
        assert!(screen.contains("♥ ★1.5k owner/beta"));
        assert!(screen.contains("♡ ★1.5k owner/alpha"));
    }
}
