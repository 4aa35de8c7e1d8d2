use ratatui::{style::Style, text::Span};

use crate::ui::theme::Theme;

/// A keyboard hint consisting of a key and its action.
#[derive(Debug, Clone)]
pub struct KeyHint {
    pub key: &'static str,
    pub action: &'static str,
}

impl KeyHint {
    pub const fn new(key: &'static str, action: &'static str) -> Self {
        Self { key, action }
    }
}

pub fn hints_to_spans(hints: &[KeyHint], theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = Vec::new();

    for (i, hint) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(hint.key, Style::default().fg(theme.accent)));
        spans.push(Span::raw(format!(" {}", hint.action)));
    }

    spans
}

pub fn hint_separator(theme: &Theme) -> Span<'static> {
    Span::styled("  │  ", Style::default().fg(theme.border))
}

pub mod common {
    use super::KeyHint;

    pub fn menu_browsing() -> Vec<KeyHint> {
        vec![
            KeyHint::new("↑↓", "select"),
            KeyHint::new("←→", "category"),
            KeyHint::new("Enter", "detail"),
            KeyHint::new("/", "search"),
            KeyHint::new("c", "cart"),
            KeyHint::new("o", "my orders"),
            KeyHint::new("t", "clear table"),
            KeyHint::new("a", "staff"),
        ]
    }

    pub fn cart() -> Vec<KeyHint> {
        vec![
            KeyHint::new("↑↓", "select"),
            KeyHint::new("+/-", "quantity"),
            KeyHint::new("d", "remove"),
            KeyHint::new("Enter", "checkout"),
            KeyHint::new("Esc", "close"),
        ]
    }

    pub fn detail() -> Vec<KeyHint> {
        vec![
            KeyHint::new("←→", "quantity"),
            KeyHint::new("type", "note"),
            KeyHint::new("Enter", "add"),
            KeyHint::new("Esc", "close"),
        ]
    }

    pub fn search() -> Vec<KeyHint> {
        vec![KeyHint::new("Enter", "search"), KeyHint::new("Esc", "cancel")]
    }

    pub fn form_editing() -> Vec<KeyHint> {
        vec![
            KeyHint::new("Tab", "next"),
            KeyHint::new("Enter", "save"),
            KeyHint::new("Esc", "cancel"),
        ]
    }

    pub fn checkout() -> Vec<KeyHint> {
        vec![
            KeyHint::new("Tab", "next"),
            KeyHint::new("←→", "payment"),
            KeyHint::new("Enter", "place order"),
            KeyHint::new("Esc", "back"),
        ]
    }

    pub fn history() -> Vec<KeyHint> {
        vec![
            KeyHint::new("r", "refresh"),
            KeyHint::new("x", "clear"),
            KeyHint::new("Esc", "close"),
        ]
    }

    pub fn confirm() -> Vec<KeyHint> {
        vec![KeyHint::new("y", "yes"), KeyHint::new("n", "no")]
    }

    pub fn admin_global() -> Vec<KeyHint> {
        vec![
            KeyHint::new("1-4", "section"),
            KeyHint::new("r", "refresh"),
            KeyHint::new("L", "sign out"),
            KeyHint::new("Esc", "menu"),
        ]
    }

    pub fn admin_orders() -> Vec<KeyHint> {
        vec![
            KeyHint::new("f", "filter"),
            KeyHint::new("c", "confirm"),
            KeyHint::new("x", "cancel"),
            KeyHint::new("d", "done"),
            KeyHint::new("D", "delete"),
        ]
    }

    pub fn admin_menu() -> Vec<KeyHint> {
        vec![
            KeyHint::new("n", "new"),
            KeyHint::new("e", "edit"),
            KeyHint::new("a", "availability"),
            KeyHint::new("D", "delete"),
        ]
    }

    pub fn admin_categories() -> Vec<KeyHint> {
        vec![
            KeyHint::new("n", "new"),
            KeyHint::new("e", "edit"),
            KeyHint::new("D", "delete"),
        ]
    }
}
