pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use flow_browser::FetchStatus;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{AppState, Mode};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let area = frame.area();
    let theme = Theme::default();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Info bar
            Constraint::Min(0),    // Page
            Constraint::Length(1), // Hints
        ])
        .split(area);

    render_info_bar(frame, layout[0], state, &theme);
    screens::capital_flow::render(frame, layout[1], state);
    render_bottom_bar(frame, layout[2], state, &theme);

    components::range::render(frame, area, state.range_form.as_ref());
    components::dialog::render(frame, area, state);
    components::confirm::render(frame, area, state.confirm.as_ref());
    components::toast::render(frame, area, state.toast.as_ref());
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let (status, status_style) = match state.page.status() {
        FetchStatus::Idle => ("OK".to_string(), Style::default().fg(theme.positive)),
        FetchStatus::Fetching => ("loading".to_string(), Style::default().fg(theme.accent)),
        FetchStatus::Error(err) => (
            format!("ERR {err} (R to retry)"),
            Style::default().fg(theme.error),
        ),
    };

    let line = Line::from(vec![
        Span::styled("Capital flow", Style::default().fg(theme.accent)),
        Span::raw("  "),
        Span::styled("Server", Style::default().fg(theme.dim)),
        Span::raw(format!(": {}  ", state.base_url)),
        Span::styled("Zone", Style::default().fg(theme.dim)),
        Span::raw(format!(": {}  ", state.page.timezone())),
        Span::styled(status, status_style),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let hints: &[(&str, &str)] = match state.mode() {
        Mode::List => &[
            ("c", "category"),
            ("y", "type"),
            ("[ ]", "month"),
            ("1/2", "today/yesterday"),
            ("g", "range"),
            ("/", "keyword"),
            ("Enter", "query"),
            ("R", "reload"),
            ("n/p", "page"),
            ("a", "add"),
            ("e", "edit"),
            ("d", "delete"),
            ("x", "reset"),
            ("q", "quit"),
        ],
        Mode::Keyword => &[("Enter", "search"), ("Esc", "done")],
        Mode::Range => &[("Tab", "next"), ("Enter", "apply"), ("Esc", "cancel")],
        Mode::Dialog => &[
            ("Tab", "next"),
            ("←/→", "category"),
            ("Enter", "save"),
            ("Esc", "cancel"),
        ],
        Mode::Confirm if state.confirm.as_ref().is_some_and(|c| c.answered()) => {
            &[("Esc", "hide")]
        }
        Mode::Confirm => &[("y", "delete"), ("n", "keep")],
    };

    let mut parts = Vec::with_capacity(hints.len() * 2);
    for (key, label) in hints {
        parts.push(Span::styled(*key, Style::default().fg(theme.accent)));
        parts.push(Span::raw(format!(" {label}  ")));
    }
    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}

#[cfg(test)]
mod tests {
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::{app::App, config::AppConfig};

    #[tokio::test]
    async fn renders_empty_page() {
        let app = App::new(&AppConfig::default()).unwrap();
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|frame| render(frame, &app.state)).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("Filters"));
        assert!(text.contains("No records for these filters."));
    }
}
