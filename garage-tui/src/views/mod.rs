//! View rendering dispatch.

pub mod assignments;
pub mod bookings;
pub mod dashboard;
pub mod inventory;
pub mod page;
pub mod services;
pub mod session;
pub mod transactions;
pub mod users;
pub mod vehicles;

pub use dashboard::DashboardPage;
pub use page::ResourcePage;

use crate::commands::PageContext;
use crate::nav::View;
use crate::state::App;
use crate::table::centered_rect;
use crate::traits::Page;
use crate::widgets::{TabBar, TabOption};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// One page per view, in [`View::all`] order.
pub fn build_pages(ctx: &PageContext) -> Vec<Box<dyn Page>> {
    View::all()
        .iter()
        .map(|view| -> Box<dyn Page> {
            match view {
                View::Dashboard => Box::new(DashboardPage::new(ctx.format.clone())),
                View::Services => Box::new(services::page(ctx)),
                View::Vehicles => Box::new(vehicles::page(ctx)),
                View::Bookings => Box::new(bookings::page(ctx)),
                View::Assignments => Box::new(assignments::page(ctx)),
                View::Inventory => Box::new(inventory::page(ctx)),
                View::Users => Box::new(users::page(ctx)),
                View::Transactions => Box::new(transactions::page(ctx)),
            }
        })
        .collect()
}

pub fn render_view(f: &mut Frame<'_>, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.size());

    render_header(f, app, layout[0]);

    if app.authenticated {
        app.active_page().render(f, layout[1], &app.theme);
    } else {
        session::render(f, layout[1], &app.theme, &app.config.credentials_path);
    }

    render_footer(f, app, layout[2]);

    if let Some(modal) = &app.modal {
        let area = centered_rect(70, 8, f.size());
        f.render_widget(Clear, area);
        let paragraph = Paragraph::new(modal.message.as_str())
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title(modal.title.as_str())
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(app.theme.border_focus)),
            );
        f.render_widget(paragraph, area);
    }
}

fn render_header(f: &mut Frame<'_>, app: &App, area: Rect) {
    let tabs: Vec<TabOption> = View::all()
        .iter()
        .map(|view| TabOption {
            label: view.title().to_string(),
            active: *view == app.active_view,
        })
        .collect();
    let user = app
        .ctx
        .client
        .credentials()
        .user()
        .map(|u| format!("{} ({})", u.name, u.role))
        .unwrap_or_else(|| "signed out".to_string());
    let title = format!("Garage Admin | {}", user);
    TabBar {
        title: &title,
        tabs: &tabs,
        active_style: Style::default()
            .fg(app.theme.bg)
            .bg(app.theme.primary)
            .add_modifier(Modifier::BOLD),
        inactive_style: Style::default().fg(app.theme.text_dim),
    }
    .render(f, area);
}

fn render_footer(f: &mut Frame<'_>, app: &App, area: Rect) {
    let (text, style) = match app.notifications.last() {
        Some(note) => {
            let color = match note.level {
                crate::notifications::NotificationLevel::Info => app.theme.info,
                crate::notifications::NotificationLevel::Warning => app.theme.warning,
                crate::notifications::NotificationLevel::Error => app.theme.error,
                crate::notifications::NotificationLevel::Success => app.theme.success,
            };
            (
                format!("{}: {}", note.level.label(), note.message),
                Style::default().fg(color),
            )
        }
        None => {
            let hint = app.active_page().hint();
            let base = "Tab switch view · / filter · n add · space select · ? help · q quit";
            let text = if hint.is_empty() {
                base.to_string()
            } else {
                format!("{} · {}", base, hint)
            };
            (text, Style::default().fg(app.theme.text_dim))
        }
    };
    let footer = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL))
        .style(style);
    f.render_widget(footer, area);
}
