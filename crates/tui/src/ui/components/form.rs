use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    app::form::{FieldKind, FormState},
    ui::{
        components::popup::{centered_box, frame_box, render_input},
        theme::Theme,
    },
};

const LABEL_WIDTH: u16 = 14;

pub fn render(frame: &mut Frame<'_>, area: Rect, form: &FormState) {
    let theme = Theme::default();
    let height = form.fields.len() as u16 + 6;
    let rect = centered_box(60, height, area);
    let inner = frame_box(frame, rect, &form.title, &theme);

    let mut constraints = vec![Constraint::Length(1); form.fields.len()];
    constraints.push(Constraint::Length(1));
    constraints.push(Constraint::Min(0));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .margin(1)
        .split(inner);

    for (idx, field) in form.fields.iter().enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(LABEL_WIDTH), Constraint::Min(0)])
            .split(rows[idx]);
        let focused = form.focus == idx;
        frame.render_widget(
            Paragraph::new(Span::styled(field.label, Style::default().fg(theme.dim))),
            cols[0],
        );
        match field.kind {
            FieldKind::Toggle => {
                let mark = if field.checked { "[x]" } else { "[ ]" };
                let style = if focused {
                    Style::default().fg(theme.accent)
                } else {
                    Style::default().fg(theme.text_muted)
                };
                frame.render_widget(Paragraph::new(Span::styled(mark, style)), cols[1]);
            }
            FieldKind::Text | FieldKind::Number => {
                render_input(frame, cols[1], &field.value, false, focused, &theme);
            }
        }
    }

    if let Some(message) = &form.message {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                message.as_str(),
                Style::default().fg(theme.error),
            ))),
            rows[form.fields.len() + 1],
        );
    }
}
