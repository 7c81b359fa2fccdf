//! Progress bar widget for ratios such as paid versus total transactions.

use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Gauge},
    Frame,
};

pub struct ProgressBar {
    pub title: String,
    pub value: f64,
    pub max: f64,
    /// Percent thresholds below which `low_style` and `mid_style` apply.
    pub thresholds: (f64, f64),
    pub low_style: Style,
    pub mid_style: Style,
    pub high_style: Style,
}

impl ProgressBar {
    pub fn ratio(&self) -> f64 {
        if self.max <= 0.0 {
            0.0
        } else {
            (self.value / self.max).clamp(0.0, 1.0)
        }
    }

    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let ratio = self.ratio();
        let percent = ratio * 100.0;

        let style = if percent < self.thresholds.0 {
            self.low_style
        } else if percent < self.thresholds.1 {
            self.mid_style
        } else {
            self.high_style
        };

        let gauge = Gauge::default()
            .block(Block::default().title(self.title.as_str()).borders(Borders::ALL))
            .gauge_style(style)
            .label(format!("{:.0}%", percent))
            .ratio(ratio);
        f.render_widget(gauge, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(value: f64, max: f64) -> ProgressBar {
        ProgressBar {
            title: "Paid".to_string(),
            value,
            max,
            thresholds: (50.0, 80.0),
            low_style: Style::default(),
            mid_style: Style::default(),
            high_style: Style::default(),
        }
    }

    #[test]
    fn ratio_is_clamped_and_guarded() {
        assert_eq!(bar(1.0, 0.0).ratio(), 0.0);
        assert_eq!(bar(3.0, 2.0).ratio(), 1.0);
        assert_eq!(bar(1.0, 4.0).ratio(), 0.25);
    }
}
