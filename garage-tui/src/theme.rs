//! Workshop theme and color utilities.

use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct Theme {
    pub bg: Color,
    pub bg_highlight: Color,
    pub primary: Color,
    pub primary_dim: Color,
    pub secondary: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub text: Color,
    pub text_dim: Color,
    pub border: Color,
    pub border_focus: Color,
}

impl Theme {
    pub fn garage() -> Self {
        Self {
            bg: Color::Rgb(14, 14, 16),
            bg_highlight: Color::Rgb(40, 44, 52),
            primary: Color::Rgb(255, 170, 0),
            primary_dim: Color::Rgb(140, 94, 0),
            secondary: Color::Rgb(97, 175, 239),
            success: Color::Rgb(80, 200, 120),
            warning: Color::Rgb(240, 200, 60),
            error: Color::Rgb(230, 70, 70),
            info: Color::Rgb(97, 175, 239),
            text: Color::Rgb(230, 230, 230),
            text_dim: Color::Rgb(130, 130, 130),
            border: Color::Rgb(70, 70, 70),
            border_focus: Color::Rgb(255, 170, 0),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::garage()
    }
}

/// Color for a payment or booking status cell.
pub fn status_color(status: &str, theme: &Theme) -> Color {
    match status.trim().to_ascii_lowercase().as_str() {
        "paid" | "completed" | "confirmed" => theme.success,
        "pending" | "inprogress" => theme.warning,
        "failed" | "cancelled" => theme.error,
        "refunded" => theme.info,
        _ => theme.text,
    }
}

/// Color for a stock level: red when out, amber when low.
pub fn stock_color(quantity: i64, theme: &Theme) -> Color {
    if quantity <= 0 {
        theme.error
    } else if quantity < 5 {
        theme.warning
    } else {
        theme.text
    }
}
