//! Shown instead of the pages while no session is stored.

use crate::theme::Theme;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use std::path::Path;

pub fn render(f: &mut Frame<'_>, area: Rect, theme: &Theme, credentials_path: &Path) {
    let lines = vec![
        Line::from(Span::styled(
            "Session required",
            Style::default()
                .fg(theme.warning)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Sign in with the garage web login; the token and user it stores in"),
        Line::from(Span::styled(
            credentials_path.display().to_string(),
            Style::default().fg(theme.primary),
        )),
        Line::from("are picked up automatically. Press r to check again or q to quit."),
    ];
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Garage Admin").borders(Borders::ALL));
    f.render_widget(paragraph, area);
}
