use flow_browser::TypeFilter;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};

use crate::{
    app::AppState,
    ui::{
        components::money::{row_color, styled_amount},
        theme::Theme,
    },
};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    render_filters(frame, layout[0], state, &theme);
    render_aggregates(frame, layout[1], state, &theme);
    render_table(frame, layout[2], state, &theme);
}

fn render_filters(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let filters = state.page.filters();
    let label = |text: &'static str| Span::styled(text, Style::default().fg(theme.dim));

    let range = filters.date_range.map_or_else(
        || "-".to_string(),
        |range| {
            format!(
                "{} .. {}",
                range.start().format(DATE_FORMAT),
                range.end().format(DATE_FORMAT)
            )
        },
    );
    let category = filters
        .category_id
        .map(|id| {
            state
                .page
                .catalog()
                .get(id)
                .map_or_else(|| format!("#{id}"), |entry| entry.display_label.clone())
        })
        .unwrap_or_else(|| "All".to_string());
    let coarse = match (filters.type_filter(), filters.coarse_type) {
        (TypeFilter::Category(_), _) => Span::styled("by category", Style::default().fg(theme.dim)),
        (_, Some(coarse)) => Span::raw(coarse.name()),
        (_, None) => Span::raw("All"),
    };

    let cursor = if state.editing_keyword { "│" } else { "" };
    let keyword_style = if state.editing_keyword {
        Style::default().fg(theme.accent)
    } else {
        Style::default().fg(theme.text)
    };

    let lines = vec![
        Line::from(vec![
            label("Range"),
            Span::raw(format!(": {range}   ")),
            label("Category"),
            Span::raw(format!(": {category}   ")),
            label("Type"),
            Span::raw(": "),
            coarse,
        ]),
        Line::from(vec![
            label("Keyword"),
            Span::raw(": "),
            Span::styled(format!("{}{cursor}", filters.search_keyword), keyword_style),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title("Filters");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_aggregates(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let aggregates = state.page.filters().aggregates;
    let line = Line::from(vec![
        Span::styled("Income ", Style::default().fg(theme.dim)),
        styled_amount(aggregates.income, theme),
        Span::styled("   Expense ", Style::default().fg(theme.dim)),
        Span::styled(
            aggregates.expense.to_string(),
            Style::default()
                .fg(theme.negative)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("   Available ", Style::default().fg(theme.dim)),
        styled_amount(aggregates.net_available, theme),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title("Totals");
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_table(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let table = state.page.table();
    let title = format!(
        "Records  page {}/{}  total {}",
        table.page(),
        table.page_count().max(1),
        table.total()
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(title);

    if table.rows().is_empty() {
        let empty = Paragraph::new(Span::styled(
            "No records for these filters.",
            Style::default().fg(theme.dim),
        ))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(["#", "Date", "Category", "Amount", "Remarks"])
        .style(Style::default().fg(theme.dim).add_modifier(Modifier::BOLD));
    let rows = table.rows().iter().map(|row| {
        Row::new(vec![
            Cell::from(row.order.to_string()),
            Cell::from(row.display_date.clone()),
            Cell::from(row.category_name.clone()),
            Cell::from(row.display_amount.clone())
                .style(Style::default().fg(row_color(row.display_color, theme))),
            Cell::from(row.remarks.clone()),
        ])
    });

    let widths = [
        Constraint::Length(4),
        Constraint::Length(17),
        Constraint::Length(18),
        Constraint::Length(14),
        Constraint::Min(10),
    ];
    let widget = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut table_state = TableState::default().with_selected(Some(state.selected));
    frame.render_stateful_widget(widget, area, &mut table_state);
}
