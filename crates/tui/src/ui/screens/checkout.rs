use api_types::order::PaymentMethod;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    app::AppState,
    checkout::{CheckoutField, CheckoutPhase, CheckoutState, success_code},
    ui::{
        components::{
            money::styled_total,
            popup::{centered_box, frame_box},
        },
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, checkout: &CheckoutState) {
    let theme = Theme::default();
    let rect = centered_box(56, 15, area);

    match &checkout.phase {
        CheckoutPhase::Success { order_id } => {
            let inner = frame_box(frame, rect, "Order placed", &theme);
            let lines = vec![
                Line::raw(""),
                Line::styled(
                    "Thank you! Your order has been sent to the kitchen.",
                    Style::default().fg(theme.positive),
                ),
                Line::raw(""),
                Line::styled(
                    success_code(order_id),
                    Style::default()
                        .fg(theme.accent)
                        .add_modifier(Modifier::BOLD),
                ),
                Line::raw(""),
                Line::styled(
                    format!(
                        "Table {} · {}",
                        checkout.table_number.trim(),
                        checkout.payment_method.label()
                    ),
                    Style::default().fg(theme.text_muted),
                ),
                Line::raw(""),
                Line::styled("Enter to close", Style::default().fg(theme.dim)),
            ];
            frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
        }
        CheckoutPhase::Loading => {
            let inner = frame_box(frame, rect, "Checkout", &theme);
            frame.render_widget(
                Paragraph::new(Line::styled(
                    "Sending your order…",
                    Style::default().fg(theme.text_muted),
                ))
                .alignment(Alignment::Center),
                inner,
            );
        }
        CheckoutPhase::Form => render_form(frame, rect, state, checkout, &theme),
    }
}

fn render_form(
    frame: &mut Frame<'_>,
    rect: Rect,
    state: &AppState,
    checkout: &CheckoutState,
    theme: &Theme,
) {
    let inner = frame_box(frame, rect, "Checkout", theme);
    let dim = Style::default().fg(theme.dim);
    let field = |focused: bool| {
        if focused {
            Style::default().fg(theme.accent)
        } else {
            Style::default().fg(theme.text_muted)
        }
    };
    let cursor = |focused: bool| if focused { "│" } else { "" };

    let name_focus = checkout.focus == CheckoutField::Name;
    let table_focus = checkout.focus == CheckoutField::Table;
    let pay_focus = checkout.focus == CheckoutField::Payment;

    let mut lines = vec![
        Line::styled("Name", dim),
        Line::styled(
            format!("{}{}", checkout.customer_name, cursor(name_focus)),
            field(name_focus),
        ),
    ];
    if let Some(err) = &checkout.errors.name {
        lines.push(Line::styled(err.clone(), Style::default().fg(theme.error)));
    }
    lines.push(Line::styled("Table number", dim));
    lines.push(Line::styled(
        format!("{}{}", checkout.table_number, cursor(table_focus)),
        field(table_focus),
    ));
    if let Some(err) = &checkout.errors.table {
        lines.push(Line::styled(err.clone(), Style::default().fg(theme.error)));
    }
    lines.push(Line::styled("Payment", dim));
    let option = |method: PaymentMethod| {
        let mark = if checkout.payment_method == method {
            "(•)"
        } else {
            "( )"
        };
        Span::styled(format!("{mark} {}   ", method.label()), field(pay_focus))
    };
    lines.push(Line::from(vec![
        option(PaymentMethod::Kasir),
        option(PaymentMethod::Qris),
    ]));
    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::raw("Total  "),
        styled_total(state.local.cart.total(), &state.currency, theme),
    ]));
    if let Some(message) = &checkout.message {
        lines.push(Line::styled(
            message.clone(),
            Style::default().fg(theme.error),
        ));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}
