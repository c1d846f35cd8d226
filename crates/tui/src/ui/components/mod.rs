pub mod confirm;
pub mod dialog;
pub mod money;
pub mod range;
pub mod toast;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::ui::theme::Theme;

/// Rect of the given size centered in `area`, clipped to it.
pub fn centered_box(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height.min(area.height)),
            Constraint::Min(0),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(width.min(area.width)),
            Constraint::Min(0),
        ])
        .split(vertical[1]);

    horizontal[1]
}

/// One labelled input row; the focused row shows a cursor.
pub fn render_input(
    frame: &mut Frame<'_>,
    area: Rect,
    label: &str,
    value: &str,
    focused: bool,
    theme: &Theme,
) {
    let cursor = if focused { "│" } else { "" };
    let style = if focused {
        Style::default().fg(theme.accent)
    } else {
        Style::default().fg(theme.text)
    };

    let line = Line::from(vec![
        Span::styled(format!("{label:<10}"), Style::default().fg(theme.dim)),
        Span::styled(format!("{value}{cursor}"), style),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

pub fn render_error(frame: &mut Frame<'_>, area: Rect, message: Option<&str>, theme: &Theme) {
    if let Some(message) = message {
        frame.render_widget(
            Paragraph::new(Span::styled(
                message.to_string(),
                Style::default().fg(theme.error),
            )),
            area,
        );
    }
}
