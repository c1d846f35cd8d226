use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::{app::ConfirmState, ui::theme::Theme};

pub fn render(frame: &mut Frame<'_>, area: Rect, confirm: Option<&ConfirmState>) {
    let Some(confirm) = confirm else {
        return;
    };
    let theme = Theme::default();

    let card = super::centered_box(52, 6, area);
    frame.render_widget(Clear, card);
    let block = Block::default()
        .title(format!(" delete record #{} ", confirm.id))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.error));

    let prompt = if confirm.answered() {
        Line::from(vec![
            Span::styled("Deleting...", Style::default().fg(theme.dim)),
            Span::raw("   "),
            Span::styled("Esc", Style::default().fg(theme.accent)),
            Span::raw(" hide"),
        ])
    } else {
        Line::from(vec![
            Span::styled("y", Style::default().fg(theme.accent)),
            Span::raw(" delete   "),
            Span::styled("n", Style::default().fg(theme.accent)),
            Span::raw(" keep"),
        ])
    };
    let lines = vec![Line::from(confirm.label.as_str()), Line::from(""), prompt];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block),
        card,
    );
}
