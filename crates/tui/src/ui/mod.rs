pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    app::{AdminSection, AppState, Overlay, Screen},
    checkout::CheckoutPhase,
    ui::components::{
        hints::{KeyHint, common, hint_separator, hints_to_spans},
        money::format_price,
    },
};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let theme = Theme::default();
    let area = frame.area();

    // Info bar, content, bottom bar
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_info_bar(frame, layout[0], state, &theme);

    match state.screen {
        Screen::Login => screens::login::render(frame, layout[1], state),
        Screen::Admin => screens::admin::render(frame, layout[1], state),
        Screen::Menu => render_customer(frame, layout[1], state),
    }

    render_bottom_bar(frame, layout[2], state, &theme);
    components::toast::render(frame, area, state.toast.as_ref());
}

fn render_customer(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    screens::menu::render(frame, area, state);

    if state.local.cart.is_open() {
        screens::cart::render(frame, area, state);
    }

    match &state.customer.overlay {
        Overlay::None => {}
        Overlay::Detail(detail) => screens::detail::render(frame, area, state, detail),
        Overlay::Checkout(checkout) => screens::checkout::render(frame, area, state, checkout),
        Overlay::History => screens::history::render(frame, area, state),
    }
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let muted = Style::default().fg(theme.text_muted);
    let table = match state.local.table.table_number() {
        "" => "-",
        table => table,
    };
    let cart = &state.local.cart;

    let line = Line::from(vec![
        Span::styled("Table", muted),
        Span::raw(format!(": {table}  ")),
        Span::styled("Cart", muted),
        Span::raw(format!(
            ": {} · {}  ",
            cart.item_count(),
            format_price(cart.total(), &state.currency)
        )),
        Span::styled("Server", muted),
        Span::raw(format!(": {}", state.base_url)),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let mut parts = hints_to_spans(&context_hints(state), theme);

    if !state.is_typing() {
        parts.push(hint_separator(theme));
        parts.push(Span::styled("q", Style::default().fg(theme.accent)));
        parts.push(Span::raw(" quit"));
    }

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}

/// Keyboard hints for whatever currently has the focus.
fn context_hints(state: &AppState) -> Vec<KeyHint> {
    match state.screen {
        Screen::Login => vec![
            KeyHint::new("Tab", "next"),
            KeyHint::new("Enter", "sign in"),
            KeyHint::new("Esc", "back"),
        ],
        Screen::Admin => {
            let admin = &state.admin;
            if admin.confirm.is_some() {
                return common::confirm();
            }
            if admin.editor.is_some() {
                return common::form_editing();
            }
            let mut hints = match admin.section {
                AdminSection::Dashboard => Vec::new(),
                AdminSection::Orders => common::admin_orders(),
                AdminSection::Menu => common::admin_menu(),
                AdminSection::Categories => common::admin_categories(),
            };
            hints.extend(common::admin_global());
            hints
        }
        Screen::Menu => match &state.customer.overlay {
            Overlay::Detail(_) => common::detail(),
            Overlay::Checkout(checkout) => match checkout.phase {
                CheckoutPhase::Form => common::checkout(),
                CheckoutPhase::Loading => Vec::new(),
                CheckoutPhase::Success { .. } => vec![KeyHint::new("Enter", "close")],
            },
            Overlay::History => common::history(),
            Overlay::None if state.local.cart.is_open() => common::cart(),
            Overlay::None if state.customer.search.is_some() => common::search(),
            Overlay::None => common::menu_browsing(),
        },
    }
}
