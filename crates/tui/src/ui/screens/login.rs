use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::Span,
    widgets::Paragraph,
};

use crate::{
    app::{AppState, LoginField},
    ui::{
        components::popup::{centered_box, frame_box, render_input},
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();

    let card_area = centered_box(40, 8, area);
    let inner = frame_box(frame, card_area, "staff sign in", &theme);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Email label
            Constraint::Length(1), // Email
            Constraint::Length(1), // Password label
            Constraint::Length(1), // Password
        ])
        .margin(1)
        .split(inner);

    let login = &state.login;
    let label = Style::default().fg(theme.dim);

    frame.render_widget(Paragraph::new(Span::styled("email", label)), rows[0]);
    render_input(
        frame,
        rows[1],
        &login.email,
        false,
        login.focus == LoginField::Email,
        &theme,
    );
    frame.render_widget(Paragraph::new(Span::styled("password", label)), rows[2]);
    render_input(
        frame,
        rows[3],
        &login.password,
        true,
        login.focus == LoginField::Password,
        &theme,
    );

    if let Some(message) = &login.message {
        let error_area = Rect {
            x: card_area.x,
            y: card_area.y + card_area.height + 1,
            width: card_area.width,
            height: 1,
        };
        frame.render_widget(
            Paragraph::new(Span::styled(
                message.as_str(),
                Style::default().fg(theme.error),
            ))
            .alignment(Alignment::Center),
            error_area.intersection(area),
        );
    }
}
