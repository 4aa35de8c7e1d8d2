use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
};

use crate::{
    app::AppState,
    ui::{
        components::{
            money::{format_price, styled_total},
            popup::frame_box,
        },
        theme::Theme,
    },
};

/// Cart panel docked on the right side.
pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let width = 46.min(area.width);
    let rect = Rect {
        x: area.x + area.width - width,
        y: area.y,
        width,
        height: area.height,
    };
    let cart = &state.local.cart;
    let inner = frame_box(
        frame,
        rect,
        &format!("Cart · {} items", cart.item_count()),
        &theme,
    );

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    if cart.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "Your cart is empty.",
                Style::default().fg(theme.dim),
            )),
            layout[0],
        );
    } else {
        let items: Vec<ListItem> = cart
            .items()
            .iter()
            .map(|line| {
                let mut lines = vec![Line::from(vec![
                    Span::raw(format!("{} × {}", line.quantity, line.name)),
                    Span::styled(
                        format!(
                            "  {}",
                            format_price(line.price * i64::from(line.quantity), &state.currency)
                        ),
                        Style::default().fg(theme.text_muted),
                    ),
                ])];
                if !line.notes.is_empty() {
                    lines.push(Line::styled(
                        format!("  note: {}", line.notes),
                        Style::default().fg(theme.dim),
                    ));
                }
                ListItem::new(lines)
            })
            .collect();
        let mut list_state =
            ListState::default().with_selected(Some(state.customer.cart_selected));
        let list = List::new(items)
            .highlight_style(Style::default().fg(theme.accent))
            .highlight_symbol("▸ ");
        frame.render_stateful_widget(list, layout[0], &mut list_state);
    }

    let table = match state.local.table.table_number() {
        "" => "no table set".to_string(),
        table => format!("table {table}"),
    };
    frame.render_widget(
        Paragraph::new(Span::styled(table, Style::default().fg(theme.dim))),
        layout[1],
    );
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::raw("Total  "),
            styled_total(cart.total(), &state.currency, &theme),
        ])),
        layout[2],
    );
}
