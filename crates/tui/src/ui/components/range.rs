use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, BorderType, Borders, Clear},
};

use crate::{
    app::{RangeField, RangeForm},
    ui::{
        components::{centered_box, render_error, render_input},
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, form: Option<&RangeForm>) {
    let Some(form) = form else {
        return;
    };
    let theme = Theme::default();

    let card = centered_box(48, 7, area);
    frame.render_widget(Clear, card);
    let block = Block::default()
        .title(" date range ")
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
        ])
        .margin(1)
        .split(inner);

    render_input(frame, rows[0], "From", &form.start, form.focus == RangeField::Start, &theme);
    render_input(frame, rows[1], "To", &form.end, form.focus == RangeField::End, &theme);
    render_error(frame, rows[2], form.error.as_deref(), &theme);
}
