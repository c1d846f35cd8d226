use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::{
    app::{AppState, DialogField},
    ui::{
        components::{centered_box, render_error, render_input},
        theme::Theme,
    },
};

/// Create/edit dialog. Stays open with the error when a save fails.
pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let Some(form) = state.dialog.as_ref() else {
        return;
    };
    let theme = Theme::default();
    let title = if form.record_id.is_some() {
        " edit record "
    } else {
        " new record "
    };

    let card = centered_box(56, 10, area);
    frame.render_widget(Clear, card);
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));
    let inner = block.inner(card);
    frame.render_widget(block, card);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .margin(1)
        .split(inner);

    let category = form
        .category_id
        .map(|id| {
            state
                .page
                .catalog()
                .get(id)
                .map_or_else(|| format!("#{id}"), |entry| entry.display_label.clone())
        })
        .unwrap_or_else(|| "-".to_string());
    let category = if form.focus == DialogField::Category {
        format!("< {category} >")
    } else {
        category
    };

    render_input(frame, rows[0], "Amount", &form.amount, form.focus == DialogField::Amount, &theme);
    render_input(frame, rows[1], "Category", &category, form.focus == DialogField::Category, &theme);
    render_input(frame, rows[2], "Date", &form.date, form.focus == DialogField::Date, &theme);
    render_input(frame, rows[3], "Remarks", &form.remarks, form.focus == DialogField::Remarks, &theme);

    if form.saving {
        frame.render_widget(
            Paragraph::new("Saving...").style(Style::default().fg(theme.dim)),
            rows[5],
        );
    } else {
        render_error(frame, rows[5], form.error.as_deref(), &theme);
    }
}
