use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::{
    app::{ToastLevel, ToastState},
    ui::theme::Theme,
};

fn marker(level: ToastLevel, theme: &Theme) -> (&'static str, Color) {
    match level {
        ToastLevel::Info => ("i", theme.accent),
        ToastLevel::Success => ("✓", theme.positive),
        ToastLevel::Error => ("!", theme.error),
    }
}

/// Short-lived notice in the lower right corner, above the hint bar.
pub fn render(frame: &mut Frame<'_>, area: Rect, toast: Option<&ToastState>) {
    let Some(toast) = toast else {
        return;
    };
    let theme = Theme::default();
    let (symbol, color) = marker(toast.level, &theme);

    let wanted = u16::try_from(toast.message.chars().count() + 6).unwrap_or(u16::MAX);
    let width = wanted.min(area.width);
    let rect = Rect {
        x: area.right().saturating_sub(width),
        y: area.bottom().saturating_sub(4),
        width,
        height: 3.min(area.height),
    };

    let line = Line::from(vec![
        Span::styled(format!("{symbol} "), Style::default().fg(color)),
        Span::styled(toast.message.as_str(), Style::default().fg(theme.text)),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
        .style(Style::default().bg(theme.panel));

    frame.render_widget(Clear, rect);
    frame.render_widget(Paragraph::new(line).block(block), rect);
}
