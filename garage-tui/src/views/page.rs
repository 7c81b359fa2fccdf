//! The generic resource page: one table over one collection.

use crate::commands::PageContext;
use crate::keys::Action;
use crate::nav::View;
use crate::notifications::Notification;
use crate::table::{render_table, FormValues, TableView};
use crate::theme::Theme;
use crate::traits::Page;
use crate::widgets::DetailPanel;
use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent};
use futures_util::future::BoxFuture;
use garage_client::{ClientError, DataClient, QueryKey, QueryState};
use garage_core::report::Document;
use garage_core::{decode_list, Resource};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::collections::BTreeSet;

/// Produces a named document from the page's rows.
pub type DocumentHook<R> = Box<
    dyn Fn(&TableView<R>, &PageContext) -> BoxFuture<'static, Result<(String, Document), String>>
        + Send
        + Sync,
>;

/// Trimmed form value, empty when absent.
pub fn field<'a>(values: &'a FormValues, key: &str) -> &'a str {
    values.get(key).map(|v| v.trim()).unwrap_or("")
}

/// Form value or `None` when blank.
pub fn optional(values: &FormValues, key: &str) -> Option<String> {
    Some(field(values, key))
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub struct ResourcePage<R: Resource> {
    view: View,
    table: TableView<R>,
    loaded: bool,
    error: Option<String>,
    document: Option<DocumentHook<R>>,
}

impl<R: Resource> ResourcePage<R> {
    pub fn new(view: View, table: TableView<R>) -> Self {
        Self {
            view,
            table,
            loaded: false,
            error: None,
            document: None,
        }
    }

    pub fn with_document(mut self, hook: DocumentHook<R>) -> Self {
        self.document = Some(hook);
        self
    }

    pub fn table(&self) -> &TableView<R> {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut TableView<R> {
        &mut self.table
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Inline read error, shown above the table.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Take a cache snapshot: rows from the payload if there is one, and the
    /// last error beside them.
    pub fn apply(&mut self, state: QueryState) {
        self.loaded = state.data.is_some() || state.error.is_some();
        let mut error = state.error.map(|e| e.user_message());
        if let Some(data) = &state.data {
            match decode_list::<R>(data) {
                Ok(rows) => self.table.set_data(rows),
                Err(err) => error = Some(ClientError::from(err).user_message()),
            }
        }
        self.error = error;
    }

    async fn submit_form(&mut self, ctx: &PageContext) {
        if let Err(message) = self.table.submit_add_form().await {
            tracing::warn!(view = self.view.title(), error = %message, "Add form rejected");
            ctx.notify(Notification::error(message));
        }
    }

    async fn generate_document(&self, ctx: &PageContext) {
        let Some(hook) = &self.document else {
            ctx.notify(Notification::info(format!(
                "No document for {}",
                self.view.title()
            )));
            return;
        };
        match hook(&self.table, ctx).await {
            Ok((stem, document)) => ctx.write_document(&stem, &document),
            Err(message) => ctx.notify(Notification::error(message)),
        }
    }

    fn render_detail(&self, f: &mut Frame<'_>, area: Rect, theme: &Theme) {
        let fields = match self.table.cursor_row() {
            Some(row) => self
                .table
                .columns()
                .iter()
                .map(|c| (c.header, c.render(row)))
                .collect(),
            None => Vec::new(),
        };
        let detail = DetailPanel {
            title: "Details",
            fields,
            label_style: Style::default().fg(theme.secondary),
            empty_message: "No row selected",
        };
        detail.render(f, area);
    }
}

#[async_trait]
impl<R: Resource> Page for ResourcePage<R> {
    fn view(&self) -> View {
        self.view
    }

    fn captures_text(&self) -> bool {
        let state = self.table.state();
        state.add_form_open || state.filter_focused
    }

    async fn handle_text(&mut self, key: KeyEvent, ctx: &PageContext) {
        if self.table.state().add_form_open {
            match key.code {
                KeyCode::Esc => self.table.close_add_form(),
                KeyCode::Enter => self.submit_form(ctx).await,
                KeyCode::Tab | KeyCode::Down => self.table.form_next_field(),
                KeyCode::BackTab | KeyCode::Up => self.table.form_prev_field(),
                KeyCode::Backspace => self.table.form_backspace(),
                KeyCode::Char(c) => self.table.form_input(c),
                _ => {}
            }
            return;
        }
        match key.code {
            KeyCode::Esc | KeyCode::Enter => self.table.blur_filter(),
            KeyCode::Backspace => self.table.filter_backspace(),
            KeyCode::Char(c) => self.table.filter_input(c),
            _ => {}
        }
    }

    async fn handle_action(&mut self, action: Action, ctx: &PageContext) -> bool {
        match action {
            Action::MoveDown => self.table.cursor_down(),
            Action::MoveUp => self.table.cursor_up(),
            Action::NextPage => self.table.next_page(),
            Action::PrevPage => self.table.prev_page(),
            Action::ToggleRow => self.table.toggle_cursor_row(),
            Action::TogglePage => self.table.toggle_page_selection(),
            Action::Sort => self.table.cycle_sort_focused(),
            Action::NextColumn => self.table.focus_next_column(),
            Action::PrevColumn => self.table.focus_prev_column(),
            Action::ToggleColumn => self.table.toggle_focused_column(),
            Action::Filter => {
                if !self.table.focus_filter() {
                    return false;
                }
            }
            Action::NewItem => {
                if !self.table.open_add_form() {
                    ctx.notify(Notification::info(format!(
                        "{} cannot be added here",
                        self.view.title()
                    )));
                }
            }
            Action::DeleteSelected => {
                if !self.table.delete_selected() {
                    ctx.notify(Notification::info("Select rows to delete first"));
                }
            }
            Action::DeleteRow => {
                self.table.delete_cursor_row();
            }
            Action::ExportSelected => {
                if !self.table.export_selected() {
                    ctx.notify(Notification::info("Select rows to export first"));
                }
            }
            Action::ExportAll => {
                self.table.export_all();
            }
            Action::Document => self.generate_document(ctx).await,
            Action::Cancel => self
                .table
                .dispatch(crate::table::TableAction::ClearSelection),
            _ => return false,
        }
        true
    }

    fn watches(&self) -> Vec<QueryKey> {
        vec![DataClient::list_key::<R>()]
    }

    async fn reload(&mut self, ctx: &PageContext, force: bool) {
        let key = DataClient::list_key::<R>();
        let state = if force {
            ctx.client.refresh(&key).await
        } else {
            ctx.client.read(&key).await
        };
        if let Some(err) = &state.error {
            tracing::warn!(view = self.view.title(), error = %err, "Read failed");
        }
        self.apply(state);
    }

    fn render(&self, f: &mut Frame<'_>, area: Rect, theme: &Theme) {
        if !self.loaded {
            let skeleton = Paragraph::new("Loading…")
                .style(Style::default().fg(theme.text_dim))
                .block(
                    Block::default()
                        .title(self.view.title())
                        .borders(Borders::ALL),
                );
            f.render_widget(skeleton, area);
            return;
        }

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(68), Constraint::Percentage(32)])
            .split(area);

        let table_area = match &self.error {
            Some(message) => {
                let rows = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Length(1), Constraint::Min(0)])
                    .split(columns[0]);
                let line = Paragraph::new(format!("Failed to load: {}", message))
                    .style(Style::default().fg(theme.error));
                f.render_widget(line, rows[0]);
                rows[1]
            }
            None => columns[0],
        };

        let title = format!("{} ({})", self.view.title(), self.table.data().len());
        render_table(f, table_area, &self.table, theme, &title);
        self.render_detail(f, columns[1], theme);
    }

    fn hidden_columns(&self) -> Vec<String> {
        self.table.state().hidden_columns.iter().cloned().collect()
    }

    fn restore_hidden_columns(&mut self, columns: Vec<String>) {
        self.table
            .set_hidden_columns(columns.into_iter().collect::<BTreeSet<String>>());
    }

    fn hint(&self) -> &'static str {
        if self.document.is_some() {
            "i document"
        } else {
            ""
        }
    }
}
