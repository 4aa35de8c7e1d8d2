use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
};

use crate::{
    app::AppState,
    ui::{
        components::{card::card_block, money::styled_price},
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    render_header(frame, layout[0], state, &theme);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(0)])
        .split(layout[1]);

    render_categories(frame, columns[0], state, &theme);
    render_items(frame, columns[1], state, &theme);
}

fn render_header(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let customer = &state.customer;
    let mut spans = Vec::new();

    if let Some(search) = &customer.search {
        spans.push(Span::styled("Search: ", Style::default().fg(theme.dim)));
        spans.push(Span::styled(
            format!("{search}│"),
            Style::default().fg(theme.accent),
        ));
    } else if let Some(term) = &customer.search_term {
        spans.push(Span::styled("Results for ", Style::default().fg(theme.dim)));
        spans.push(Span::styled(
            format!("\"{term}\""),
            Style::default().fg(theme.text),
        ));
        spans.push(Span::styled(
            "  (Esc back to category)",
            Style::default().fg(theme.dim),
        ));
    } else if let Some(category) = customer.current_category() {
        spans.push(Span::raw(format!("{} {}", category.emoji, category.label)));
    }

    if let Some(err) = &customer.error {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(err.as_str(), Style::default().fg(theme.error)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_categories(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let customer = &state.customer;
    let items: Vec<ListItem> = customer
        .categories
        .iter()
        .map(|category| {
            let count = customer.available_in(&category.id);
            ListItem::new(Line::from(vec![
                Span::raw(format!("{} {}", category.emoji, category.label)),
                Span::styled(format!("  {count}"), Style::default().fg(theme.dim)),
            ]))
        })
        .collect();

    let selected = (customer.search_term.is_none() && !customer.categories.is_empty())
        .then_some(customer.category);
    let mut list_state = ListState::default().with_selected(selected);
    let list = List::new(items)
        .block(card_block("Categories", false, theme))
        .highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_items(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let customer = &state.customer;
    let title = match (&customer.search_term, customer.current_category()) {
        (Some(_), _) => "Search results".to_string(),
        (None, Some(category)) => format!(
            "{} items available",
            customer.available_in(&category.id)
        ),
        (None, None) => "Menu".to_string(),
    };

    if customer.items.is_empty() {
        let block = card_block(&title, true, theme);
        frame.render_widget(
            Paragraph::new(Span::styled(
                "Nothing to show here.",
                Style::default().fg(theme.dim),
            ))
            .block(block),
            area,
        );
        return;
    }

    let items: Vec<ListItem> = customer
        .items
        .iter()
        .map(|item| {
            let name_style = if item.available {
                Style::default().fg(theme.text)
            } else {
                Style::default()
                    .fg(theme.dim)
                    .add_modifier(Modifier::CROSSED_OUT)
            };
            let mut first = vec![
                Span::styled(item.name.clone(), name_style),
                Span::raw("  "),
                styled_price(item.price, &state.currency, theme),
            ];
            if !item.available {
                first.push(Span::styled("  sold out", Style::default().fg(theme.error)));
            }
            let mut lines = vec![Line::from(first)];
            if !item.description.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("  {}", item.description),
                    Style::default().fg(theme.dim),
                )));
            }
            ListItem::new(lines)
        })
        .collect();

    let mut list_state = ListState::default().with_selected(Some(customer.selected));
    let list = List::new(items)
        .block(card_block(&title, true, theme))
        .highlight_style(Style::default().bg(theme.panel))
        .highlight_symbol("▸ ");
    frame.render_stateful_widget(list, area, &mut list_state);
}
