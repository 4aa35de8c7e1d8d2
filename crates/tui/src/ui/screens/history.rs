use api_types::order::OrderStatus;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use crate::{
    app::AppState,
    checkout::success_code,
    ui::{
        components::{
            money::format_price,
            popup::{centered_box, frame_box},
        },
        theme::Theme,
    },
};

pub fn status_color(status: OrderStatus, theme: &Theme) -> Color {
    match status {
        OrderStatus::Pending => theme.warning,
        OrderStatus::Confirmed | OrderStatus::Preparing => theme.accent,
        OrderStatus::Completed => theme.positive,
        OrderStatus::Cancelled => theme.error,
    }
}

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let rect = centered_box(70, area.height.saturating_sub(4), area);
    let inner = frame_box(frame, rect, "My orders", &theme);
    let history = &state.customer.history;
    let dim = Style::default().fg(theme.dim);

    let mut lines = Vec::new();
    if let Some(err) = &history.error {
        lines.push(Line::styled(err.clone(), Style::default().fg(theme.error)));
    }
    if state.local.history.is_empty() {
        lines.push(Line::styled("No orders placed from here yet.", dim));
    }

    for order in &history.orders {
        let created = order
            .created_at
            .with_timezone(&state.timezone)
            .format("%d %b %H:%M");
        lines.push(Line::from(vec![
            Span::styled(
                success_code(&order.id),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  {created}  table {}", order.table_number), dim),
        ]));
        lines.push(Line::from(vec![
            Span::styled(
                order.status.label(),
                Style::default().fg(status_color(order.status, &theme)),
            ),
            Span::raw("  "),
            Span::raw(format_price(order.total_price, &state.currency)),
        ]));
        for item in &order.items {
            let name = item
                .menu_item
                .as_ref()
                .map(|m| m.name.as_str())
                .unwrap_or("(removed item)");
            let mut text = format!("  {} × {name}", item.quantity);
            if let Some(note) = item.notes.as_deref().filter(|n| !n.is_empty()) {
                text.push_str(&format!(" ({note})"));
            }
            lines.push(Line::styled(text, Style::default().fg(theme.text_muted)));
        }
        lines.push(Line::raw(""));
    }

    if history.missing > 0 {
        lines.push(Line::styled(
            format!("{} order(s) no longer available.", history.missing),
            dim,
        ));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
