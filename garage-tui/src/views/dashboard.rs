//! Dashboard: aggregate statistics over the fetched collections.

use crate::commands::PageContext;
use crate::keys::Action;
use crate::nav::View;
use crate::notifications::Notification;
use crate::theme::{status_color, Theme};
use crate::traits::Page;
use crate::widgets::{ProgressBar, StatusIndicator};
use async_trait::async_trait;
use garage_client::{ClientResult, DataClient, QueryKey};
use garage_core::report::{transactions_summary, DocumentFormat};
use garage_core::{Booking, DashboardStats, Service, Transaction, Vehicle};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

const RECENT: usize = 8;

#[derive(Default)]
pub struct DashboardPage {
    stats: Option<DashboardStats>,
    transactions: Vec<Transaction>,
    errors: Vec<String>,
    format: DocumentFormat,
}

impl DashboardPage {
    pub fn new(format: DocumentFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    pub fn stats(&self) -> Option<&DashboardStats> {
        self.stats.as_ref()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Build statistics from the four list reads. Failed reads count as zero
    /// and are reported beside the figures.
    pub fn apply(
        &mut self,
        services: ClientResult<Vec<Service>>,
        vehicles: ClientResult<Vec<Vehicle>>,
        bookings: ClientResult<Vec<Booking>>,
        transactions: ClientResult<Vec<Transaction>>,
    ) {
        let mut errors = Vec::new();
        let mut count = |label: &str, result: ClientResult<usize>| match result {
            Ok(n) => n,
            Err(err) => {
                errors.push(format!("{}: {}", label, err.user_message()));
                0
            }
        };
        let services = count("Services", services.map(|v| v.len()));
        let vehicles = count("Vehicles", vehicles.map(|v| v.len()));
        let bookings = count("Bookings", bookings.map(|v| v.len()));
        let transactions = match transactions {
            Ok(rows) => rows,
            Err(err) => {
                errors.push(format!("Transactions: {}", err.user_message()));
                Vec::new()
            }
        };

        self.stats = Some(
            DashboardStats::from_transactions(&transactions)
                .with_counts(services, vehicles, bookings),
        );
        self.transactions = transactions;
        self.errors = errors;
    }

    fn render_tiles(&self, f: &mut Frame<'_>, area: Rect, stats: &DashboardStats, theme: &Theme) {
        let tiles = [
            ("Revenue", self.format.currency(stats.total_revenue), theme.success),
            (
                "Avg. transaction",
                self.format.currency(stats.average_transaction),
                theme.primary,
            ),
            ("Transactions", stats.total_transactions.to_string(), theme.text),
            ("Pending", stats.pending_transactions.to_string(), theme.warning),
            ("Services", stats.services.to_string(), theme.secondary),
            ("Vehicles", stats.vehicles.to_string(), theme.secondary),
            ("Bookings", stats.bookings.to_string(), theme.secondary),
        ];
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, tiles.len() as u32); tiles.len()])
            .split(area);
        for ((title, value, color), chunk) in tiles.into_iter().zip(chunks.iter()) {
            StatusIndicator::new(title, value, Style::default().fg(color)).render(f, *chunk);
        }
    }

    fn render_recent(&self, f: &mut Frame<'_>, area: Rect, theme: &Theme) {
        let mut recent: Vec<&Transaction> = self.transactions.iter().collect();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let items: Vec<ListItem> = recent
            .into_iter()
            .take(RECENT)
            .map(|tx| {
                let status = tx.status.to_string();
                ListItem::new(Line::from(vec![
                    Span::raw(format!(
                        "{:<12} ",
                        self.format.date(tx.created_at)
                    )),
                    Span::raw(format!(
                        "{:<20} ",
                        tx.customer_name.as_deref().unwrap_or("-")
                    )),
                    Span::styled(
                        format!("{:<10} ", status),
                        Style::default().fg(status_color(&status, theme)),
                    ),
                    Span::raw(self.format.currency(tx.amount)),
                ]))
            })
            .collect();
        let list = List::new(items).block(
            Block::default()
                .title("Recent transactions")
                .borders(Borders::ALL),
        );
        f.render_widget(list, area);
    }
}

#[async_trait]
impl Page for DashboardPage {
    fn view(&self) -> View {
        View::Dashboard
    }

    async fn handle_action(&mut self, action: Action, ctx: &PageContext) -> bool {
        match action {
            Action::Document => {
                let document = transactions_summary(&self.transactions, &ctx.format);
                ctx.write_document("transactions-summary", &document);
                true
            }
            Action::ExportAll => {
                match &self.stats {
                    Some(stats) => match crate::commands::export_json(&ctx.export_dir, "dashboard", stats) {
                        Ok(path) => ctx.notify(Notification::success(format!(
                            "Statistics exported to {}",
                            path.display()
                        ))),
                        Err(err) => ctx.notify(Notification::error(format!("Export failed: {}", err))),
                    },
                    None => ctx.notify(Notification::info("Statistics are still loading")),
                }
                true
            }
            _ => false,
        }
    }

    fn watches(&self) -> Vec<QueryKey> {
        vec![
            DataClient::list_key::<Service>(),
            DataClient::list_key::<Vehicle>(),
            DataClient::list_key::<Booking>(),
            DataClient::list_key::<Transaction>(),
        ]
    }

    async fn reload(&mut self, ctx: &PageContext, force: bool) {
        let client = &ctx.client;
        let services_key = DataClient::list_key::<Service>();
        let vehicles_key = DataClient::list_key::<Vehicle>();
        let bookings_key = DataClient::list_key::<Booking>();
        let transactions_key = DataClient::list_key::<Transaction>();
        let (services, vehicles, bookings, transactions) = if force {
            tokio::join!(
                client.refresh_list::<Service>(&services_key),
                client.refresh_list::<Vehicle>(&vehicles_key),
                client.refresh_list::<Booking>(&bookings_key),
                client.refresh_list::<Transaction>(&transactions_key),
            )
        } else {
            tokio::join!(
                client.list::<Service>(&services_key),
                client.list::<Vehicle>(&vehicles_key),
                client.list::<Booking>(&bookings_key),
                client.list::<Transaction>(&transactions_key),
            )
        };
        self.apply(services, vehicles, bookings, transactions);
        if !self.errors.is_empty() {
            tracing::warn!(errors = ?self.errors, "Dashboard loaded with errors");
        }
    }

    fn render(&self, f: &mut Frame<'_>, area: Rect, theme: &Theme) {
        let Some(stats) = &self.stats else {
            let skeleton = Paragraph::new("Loading…")
                .style(Style::default().fg(theme.text_dim))
                .block(Block::default().title("Dashboard").borders(Borders::ALL));
            f.render_widget(skeleton, area);
            return;
        };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(4),
                Constraint::Length(self.errors.len() as u16),
            ])
            .split(area);

        self.render_tiles(f, rows[0], stats, theme);

        ProgressBar {
            title: format!(
                "Paid {} of {} transactions",
                stats.paid_transactions, stats.total_transactions
            ),
            value: stats.paid_transactions as f64,
            max: stats.total_transactions as f64,
            thresholds: (50.0, 80.0),
            low_style: Style::default().fg(theme.error),
            mid_style: Style::default().fg(theme.warning),
            high_style: Style::default().fg(theme.success),
        }
        .render(f, rows[1]);

        self.render_recent(f, rows[2], theme);

        if !self.errors.is_empty() {
            let lines: Vec<Line> = self
                .errors
                .iter()
                .map(|e| Line::from(Span::styled(e.clone(), Style::default().fg(theme.error))))
                .collect();
            f.render_widget(Paragraph::new(lines), rows[3]);
        }
    }

    fn hint(&self) -> &'static str {
        "i summary · E export stats"
    }
}
