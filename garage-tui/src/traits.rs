//! Common traits for TUI pages.

use crate::commands::PageContext;
use crate::keys::Action;
use crate::nav::View;
use crate::theme::Theme;
use async_trait::async_trait;
use crossterm::event::KeyEvent;
use garage_client::QueryKey;
use ratatui::{layout::Rect, Frame};

/// One screen of the client.
///
/// Pages own their data and table state. The application routes key events
/// to the active page and tells pages when their queries go stale.
#[async_trait]
pub trait Page: Send {
    fn view(&self) -> View;

    /// The page is consuming raw keystrokes (filter input, add form).
    fn captures_text(&self) -> bool {
        false
    }

    /// Handle a keystroke while [`Page::captures_text`] is true.
    async fn handle_text(&mut self, _key: KeyEvent, _ctx: &PageContext) {}

    /// Handle a normal-mode action. Returns false when the action means
    /// nothing to this page.
    async fn handle_action(&mut self, action: Action, ctx: &PageContext) -> bool;

    /// Query keys whose invalidation should trigger a reload.
    fn watches(&self) -> Vec<QueryKey>;

    /// Load data through the cache. `force` skips the fresh-entry shortcut.
    async fn reload(&mut self, ctx: &PageContext, force: bool);

    fn render(&self, f: &mut Frame<'_>, area: Rect, theme: &Theme);

    /// Hidden column ids, for persistence.
    fn hidden_columns(&self) -> Vec<String> {
        Vec::new()
    }

    fn restore_hidden_columns(&mut self, _columns: Vec<String>) {}

    /// Footer hint for the page's own bindings.
    fn hint(&self) -> &'static str {
        ""
    }
}
