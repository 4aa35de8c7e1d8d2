use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use crate::{
    app::{AppState, DetailState},
    ui::{
        components::{
            money::{styled_price, styled_total},
            popup::{centered_box, frame_box},
        },
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, detail: &DetailState) {
    let theme = Theme::default();
    let rect = centered_box(56, 14, area);
    let inner = frame_box(frame, rect, &detail.item.name, &theme);

    let item = &detail.item;
    let category = state
        .customer
        .category_label(&item.category_id)
        .unwrap_or(item.category_id.as_str());
    let dim = Style::default().fg(theme.dim);

    let mut lines = vec![
        Line::from(vec![
            styled_price(item.price, &state.currency, &theme),
            Span::styled(format!("  · {category}"), dim),
        ]),
        Line::raw(""),
    ];
    if !item.description.is_empty() {
        lines.push(Line::styled(item.description.clone(), Style::default().fg(theme.text)));
        lines.push(Line::raw(""));
    }
    lines.push(Line::from(vec![
        Span::styled("Quantity  ", dim),
        Span::styled("◂ ", Style::default().fg(theme.accent)),
        Span::styled(
            detail.quantity.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(" ▸", Style::default().fg(theme.accent)),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Note      ", dim),
        Span::styled(
            format!("{}│", detail.note),
            Style::default().fg(theme.accent),
        ),
    ]));
    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::styled("Subtotal  ", dim),
        styled_total(detail.subtotal(), &state.currency, &theme),
    ]));

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
