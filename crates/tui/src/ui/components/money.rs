use ratatui::{
    style::{Modifier, Style},
    text::Span,
};

use crate::ui::theme::Theme;

/// Formats an amount in the smallest unit with `.` thousands separators,
/// e.g. `Rp 15.000`.
#[must_use]
pub fn format_price(amount: i64, currency: &str) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    let sign = if amount < 0 { "-" } else { "" };
    if currency.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{currency} {grouped}")
    }
}

#[must_use]
pub fn styled_price(amount: i64, currency: &str, theme: &Theme) -> Span<'static> {
    Span::styled(
        format_price(amount, currency),
        Style::default().fg(theme.accent),
    )
}

/// Bold variant for totals.
#[must_use]
pub fn styled_total(amount: i64, currency: &str, theme: &Theme) -> Span<'static> {
    Span::styled(
        format_price(amount, currency),
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD),
    )
}
