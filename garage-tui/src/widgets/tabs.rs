//! Tab bar widget listing the views.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

#[derive(Debug, Clone)]
pub struct TabOption {
    pub label: String,
    pub active: bool,
}

pub struct TabBar<'a> {
    pub title: &'a str,
    pub tabs: &'a [TabOption],
    pub active_style: Style,
    pub inactive_style: Style,
}

impl<'a> TabBar<'a> {
    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let spans: Vec<Span> = self
            .tabs
            .iter()
            .enumerate()
            .map(|(index, tab)| {
                let style = if tab.active {
                    self.active_style
                } else {
                    self.inactive_style
                };
                Span::styled(format!(" {} {} ", index + 1, tab.label), style)
            })
            .collect();

        let paragraph = Paragraph::new(Line::from(spans))
            .block(Block::default().title(self.title).borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }
}
