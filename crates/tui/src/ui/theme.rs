use ratatui::style::Color;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub panel: Color,
    pub text: Color,
    pub text_muted: Color,
    pub dim: Color,
    pub accent: Color,
    pub border: Color,
    pub positive: Color,
    pub warning: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            panel: Color::Rgb(32, 26, 20),
            text: Color::Rgb(225, 220, 210),
            text_muted: Color::Rgb(170, 160, 145),
            dim: Color::Rgb(120, 112, 100),
            accent: Color::Rgb(235, 140, 60),
            border: Color::Rgb(80, 70, 60),
            positive: Color::Rgb(110, 190, 110),
            warning: Color::Rgb(220, 180, 70),
            error: Color::Rgb(210, 80, 80),
        }
    }
}
