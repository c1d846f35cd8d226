use ratatui::style::Color;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub text: Color,
    pub dim: Color,
    pub accent: Color,
    pub border: Color,
    pub error: Color,
    pub positive: Color,
    pub negative: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            text: Color::Rgb(220, 220, 220),
            dim: Color::Rgb(140, 140, 140),
            accent: Color::Rgb(80, 160, 160),
            border: Color::Rgb(70, 80, 90),
            error: Color::Rgb(200, 80, 80),
            positive: Color::Rgb(82, 196, 26),
            negative: Color::Rgb(245, 34, 45),
        }
    }
}
