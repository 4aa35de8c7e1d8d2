use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};

use crate::ui::theme::Theme;

/// Rounded panel with an accent title.
pub fn card_block<'a>(title: &'a str, focused: bool, theme: &Theme) -> Block<'a> {
    let border = if focused { theme.accent } else { theme.border };
    Block::default()
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(theme.accent),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
}

/// Dashboard tile: a caption, one figure and an optional hint below it.
pub struct StatCard<'a> {
    caption: &'a str,
    figure: String,
    hint: Option<&'a str>,
    theme: Theme,
}

impl<'a> StatCard<'a> {
    pub fn new(caption: &'a str, figure: impl Into<String>, theme: &Theme) -> Self {
        Self {
            caption,
            figure: figure.into(),
            hint: None,
            theme: *theme,
        }
    }

    pub fn hint(self, hint: &'a str) -> Self {
        Self {
            hint: Some(hint),
            ..self
        }
    }
}

impl Widget for StatCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = card_block(self.caption, false, &self.theme);
        let figure = Line::styled(
            self.figure,
            Style::default()
                .fg(self.theme.text)
                .add_modifier(Modifier::BOLD),
        );
        let lines = match self.hint {
            Some(hint) => vec![figure, Line::styled(hint, Style::default().fg(self.theme.dim))],
            None => vec![figure],
        };
        Paragraph::new(lines).block(block).render(area, buf);
    }
}
