use api_types::order::OrderView;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph, Wrap},
};

use crate::{
    app::{AdminSection, AppState, Confirm},
    checkout::success_code,
    ui::{
        components::{
            card::{StatCard, card_block},
            form,
            money::{format_price, styled_price},
            popup::{centered_box, frame_box},
            tabs::render_tabs,
        },
        screens::history::status_color,
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .split(area);

    render_status(frame, layout[0], state, &theme);
    render_tabs(frame, layout[1], state.admin.section, &theme);

    match state.admin.section {
        AdminSection::Dashboard => render_dashboard(frame, layout[2], state, &theme),
        AdminSection::Orders => render_orders(frame, layout[2], state, &theme),
        AdminSection::Menu => render_menu(frame, layout[2], state, &theme),
        AdminSection::Categories => render_categories(frame, layout[2], state, &theme),
    }

    if let Some(editor) = &state.admin.editor {
        form::render(frame, area, &editor.form);
    }
    if let Some(confirm) = &state.admin.confirm {
        render_confirm(frame, area, confirm, &theme);
    }
}

fn render_status(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let admin = &state.admin;
    let (live, live_style) = if admin.live {
        ("● live", Style::default().fg(theme.positive))
    } else {
        ("○ offline", Style::default().fg(theme.warning))
    };
    let mut spans = vec![
        Span::styled("Signed in", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}  ", admin.email)),
        Span::styled(live, live_style),
    ];
    if let Some(err) = &admin.error {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(err.as_str(), Style::default().fg(theme.error)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_dashboard(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let stats = state.admin.stats(state.timezone);
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(layout[0]);

    frame.render_widget(
        StatCard::new("Pending", stats.pending.to_string(), theme).hint("waiting for confirmation"),
        cards[0],
    );
    frame.render_widget(
        StatCard::new("Cooking", stats.confirmed.to_string(), theme).hint("confirmed"),
        cards[1],
    );
    frame.render_widget(
        StatCard::new("Done today", stats.completed_today.to_string(), theme),
        cards[2],
    );
    frame.render_widget(
        StatCard::new(
            "Revenue today",
            format_price(stats.revenue_today, &state.currency),
            theme,
        ),
        cards[3],
    );

    let recent: Vec<ListItem> = state
        .admin
        .all_orders
        .iter()
        .take(usize::from(layout[1].height.saturating_sub(2)))
        .map(|order| order_row(order, state, theme))
        .collect();
    let list = List::new(recent).block(card_block("Latest orders", false, theme));
    frame.render_widget(list, layout[1]);
}

fn order_row(order: &OrderView, state: &AppState, theme: &Theme) -> ListItem<'static> {
    let created = order
        .created_at
        .with_timezone(&state.timezone)
        .format("%H:%M");
    ListItem::new(Line::from(vec![
        Span::styled(format!("{created}  "), Style::default().fg(theme.dim)),
        Span::raw(format!("T{:<4} ", order.table_number)),
        Span::raw(format!("{:<16} ", order.customer_name)),
        Span::styled(
            format!("{:<10} ", order.status.as_str()),
            Style::default().fg(status_color(order.status, theme)),
        ),
        Span::raw(format_price(order.total_price, &state.currency)),
    ]))
}

fn render_orders(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let admin = &state.admin;
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let title = format!(
        "Orders · {}",
        admin.order_filter.map(|s| s.as_str()).unwrap_or("all")
    );
    let rows: Vec<ListItem> = admin
        .orders
        .iter()
        .map(|order| order_row(order, state, theme))
        .collect();
    let mut list_state = ListState::default()
        .with_selected((!admin.orders.is_empty()).then_some(admin.orders_selected));
    let list = List::new(rows)
        .block(card_block(&title, true, theme))
        .highlight_style(Style::default().bg(theme.panel))
        .highlight_symbol("▸ ");
    frame.render_stateful_widget(list, columns[0], &mut list_state);

    let block = card_block("Detail", false, theme);
    let Some(order) = admin.selected_order() else {
        frame.render_widget(
            Paragraph::new(Span::styled("No orders.", Style::default().fg(theme.dim)))
                .block(block),
            columns[1],
        );
        return;
    };

    let dim = Style::default().fg(theme.dim);
    let mut lines = vec![
        Line::styled(
            success_code(&order.id),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Line::raw(format!(
            "{} · table {}",
            order.customer_name, order.table_number
        )),
        Line::styled(order.payment_method.label(), dim),
        Line::styled(
            order
                .created_at
                .with_timezone(&state.timezone)
                .format("%d %b %Y %H:%M")
                .to_string(),
            dim,
        ),
        Line::raw(""),
    ];
    for item in &order.items {
        let name = item
            .menu_item
            .as_ref()
            .map(|m| m.name.as_str())
            .unwrap_or("(removed item)");
        lines.push(Line::from(vec![
            Span::raw(format!("{} × {name}  ", item.quantity)),
            Span::styled(
                format_price(item.price_at_order * i64::from(item.quantity), &state.currency),
                Style::default().fg(theme.text_muted),
            ),
        ]));
        if let Some(note) = item.notes.as_deref().filter(|n| !n.is_empty()) {
            lines.push(Line::styled(format!("  note: {note}"), dim));
        }
    }
    if let Some(note) = order.notes.as_deref().filter(|n| !n.is_empty()) {
        lines.push(Line::styled(format!("Order note: {note}"), dim));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::raw("Total  "),
        styled_price(order.total_price, &state.currency, theme),
    ]));
    lines.push(Line::from(vec![
        Span::raw("Status "),
        Span::styled(
            order.status.as_str(),
            Style::default().fg(status_color(order.status, theme)),
        ),
    ]));
    let next: Vec<&str> = order
        .status
        .ui_transitions()
        .iter()
        .map(|s| s.as_str())
        .collect();
    if !next.is_empty() {
        lines.push(Line::styled(format!("Can move to: {}", next.join(", ")), dim));
    }

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        columns[1],
    );
}

fn render_menu(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let admin = &state.admin;
    let rows: Vec<ListItem> = admin
        .menu
        .iter()
        .map(|item| {
            let category = admin
                .categories
                .iter()
                .find(|c| c.id == item.category_id)
                .map(|c| c.label.as_str())
                .unwrap_or(item.category_id.as_str());
            let availability = if item.available {
                Span::styled("available", Style::default().fg(theme.positive))
            } else {
                Span::styled("sold out", Style::default().fg(theme.error))
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("#{:<4}", item.id), Style::default().fg(theme.dim)),
                Span::raw(format!("{:<24} ", item.name)),
                Span::styled(format!("{category:<14} "), Style::default().fg(theme.text_muted)),
                styled_price(item.price, &state.currency, theme),
                Span::raw("  "),
                availability,
            ]))
        })
        .collect();

    let title = format!("Menu · {} items", admin.menu.len());
    let mut list_state =
        ListState::default().with_selected((!admin.menu.is_empty()).then_some(admin.menu_selected));
    let list = List::new(rows)
        .block(card_block(&title, true, theme))
        .highlight_style(Style::default().bg(theme.panel))
        .highlight_symbol("▸ ");
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_categories(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let admin = &state.admin;
    let rows: Vec<ListItem> = admin
        .categories
        .iter()
        .map(|category| {
            let count = admin
                .menu
                .iter()
                .filter(|item| item.category_id == category.id)
                .count();
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:>3}  ", category.sort_order),
                    Style::default().fg(theme.dim),
                ),
                Span::raw(format!("{} {:<20} ", category.emoji, category.label)),
                Span::styled(
                    format!("{:<14} {count} items", category.id),
                    Style::default().fg(theme.text_muted),
                ),
            ]))
        })
        .collect();

    let mut list_state = ListState::default()
        .with_selected((!admin.categories.is_empty()).then_some(admin.categories_selected));
    let list = List::new(rows)
        .block(card_block("Categories", true, theme))
        .highlight_style(Style::default().bg(theme.panel))
        .highlight_symbol("▸ ");
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_confirm(frame: &mut Frame<'_>, area: Rect, confirm: &Confirm, theme: &Theme) {
    let rect = centered_box(52, 5, area);
    let inner = frame_box(frame, rect, "Confirm", theme);
    let lines = vec![
        Line::raw(confirm.prompt()),
        Line::styled("y / n", Style::default().fg(theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        inner,
    );
}
