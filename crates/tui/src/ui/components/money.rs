use flow_browser::Amount;
use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
};

use crate::ui::theme::Theme;

/// Amount with two decimals, colored by sign.
#[must_use]
pub fn styled_amount(amount: Amount, theme: &Theme) -> Span<'static> {
    let color = match amount.minor() {
        minor if minor > 0 => theme.positive,
        minor if minor < 0 => theme.negative,
        _ => theme.text,
    };
    Span::styled(
        amount.to_string(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )
}

/// Parses a `#rrggbb` row color, falling back to the plain text color.
#[must_use]
pub fn row_color(hex: &str, theme: &Theme) -> Color {
    hex.parse().unwrap_or(theme.text)
}
