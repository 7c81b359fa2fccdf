//! Application state and event routing.

use crate::commands::PageContext;
use crate::config::TuiConfig;
use crate::events::TuiEvent;
use crate::keys::{map_key, Action, HELP};
use crate::nav::View;
use crate::notifications::Notification;
use crate::persistence::PersistedState;
use crate::theme::Theme;
use crate::traits::Page;
use crate::views;
use chrono::Utc;
use crossterm::event::KeyEvent;
use garage_client::{CacheEvent, CacheEventKind};
use std::collections::HashSet;

const NOTIFICATION_TTL_SECS: i64 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modal {
    pub title: String,
    pub message: String,
}

pub struct App {
    pub config: TuiConfig,
    pub theme: Theme,
    pub ctx: PageContext,
    pub active_view: View,
    pub notifications: Vec<Notification>,
    pub modal: Option<Modal>,
    pub authenticated: bool,
    /// One page per view, in [`View::all`] order.
    pages: Vec<Box<dyn Page>>,
    /// Views whose queries were invalidated while they were off screen.
    stale: HashSet<View>,
}

impl App {
    pub fn new(config: TuiConfig, ctx: PageContext) -> Self {
        let pages = views::build_pages(&ctx);
        let authenticated = ctx.client.credentials().is_authenticated();
        Self {
            config,
            theme: Theme::garage(),
            ctx,
            active_view: View::Dashboard,
            notifications: Vec::new(),
            modal: None,
            authenticated,
            pages,
            stale: HashSet::new(),
        }
    }

    pub fn page(&self, view: View) -> &dyn Page {
        self.pages[view.index()].as_ref()
    }

    pub fn active_page(&self) -> &dyn Page {
        self.page(self.active_view)
    }

    pub fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    pub fn prune_notifications(&mut self) {
        let now = Utc::now();
        let ttl = chrono::Duration::seconds(NOTIFICATION_TTL_SECS);
        self.notifications.retain(|n| !n.is_expired(now, ttl));
    }

    pub fn is_stale(&self, view: View) -> bool {
        self.stale.contains(&view)
    }

    /// Re-read the credential store. A session appearing drops everything
    /// cached while anonymous.
    pub fn check_session(&mut self) -> bool {
        let authenticated = self.ctx.client.credentials().is_authenticated();
        if authenticated && !self.authenticated {
            tracing::info!("Session found");
            self.ctx.client.cache().clear();
            self.stale.extend(View::all().iter().copied());
        } else if !authenticated && self.authenticated {
            tracing::info!("Session gone");
        }
        self.authenticated = authenticated;
        authenticated
    }

    pub async fn reload_active(&mut self, force: bool) {
        if !self.authenticated {
            return;
        }
        let view = self.active_view;
        self.stale.remove(&view);
        self.pages[view.index()].reload(&self.ctx, force).await;
    }

    pub async fn switch_view(&mut self, view: View) {
        self.active_view = view;
        let force = self.stale.contains(&view);
        self.reload_active(force).await;
    }

    /// Mark every page watching the key stale and reload the visible one.
    pub async fn handle_cache_event(&mut self, event: CacheEvent) {
        if event.kind != CacheEventKind::Invalidated {
            return;
        }
        let affected: Vec<View> = self
            .pages
            .iter()
            .filter(|page| {
                page.watches()
                    .iter()
                    .any(|key| key.endpoint() == event.key.endpoint())
            })
            .map(|page| page.view())
            .collect();
        if affected.is_empty() {
            return;
        }
        tracing::debug!(key = %event.key, ?affected, "Pages marked stale");
        self.stale.extend(affected.iter().copied());
        if affected.contains(&self.active_view) {
            self.reload_active(false).await;
        }
    }

    /// Returns true when the application should exit.
    pub async fn handle_event(&mut self, event: TuiEvent) -> bool {
        match event {
            TuiEvent::Input(key) => return self.handle_key(key).await,
            TuiEvent::Tick => {
                self.prune_notifications();
                self.check_session();
                let force = self.stale.contains(&self.active_view);
                self.reload_active(force).await;
            }
            TuiEvent::Notify(notification) => self.notify(notification),
            TuiEvent::Cache(event) => self.handle_cache_event(event).await,
            TuiEvent::Resize { .. } => {}
        }
        false
    }

    pub async fn handle_key(&mut self, key: KeyEvent) -> bool {
        if self.modal.is_some() {
            if matches!(
                map_key(key),
                Some(Action::Cancel | Action::Confirm | Action::OpenHelp | Action::Quit)
            ) {
                self.modal = None;
            }
            return false;
        }

        let index = self.active_view.index();
        if self.authenticated && self.pages[index].captures_text() {
            self.pages[index].handle_text(key, &self.ctx).await;
            return false;
        }

        let Some(action) = map_key(key) else {
            return false;
        };
        match action {
            Action::Quit => return true,
            Action::OpenHelp => {
                self.modal = Some(Modal {
                    title: "Keybindings".to_string(),
                    message: HELP.to_string(),
                });
            }
            Action::Refresh => {
                if self.check_session() {
                    self.reload_active(true).await;
                } else {
                    self.notify(Notification::info("No session stored yet"));
                }
            }
            _ if !self.authenticated => {}
            Action::NextView => self.switch_view(self.active_view.next()).await,
            Action::PrevView => self.switch_view(self.active_view.previous()).await,
            Action::SwitchView(i) => {
                if let Some(view) = View::from_index(i) {
                    self.switch_view(view).await;
                }
            }
            other => {
                self.pages[index].handle_action(other, &self.ctx).await;
            }
        }
        false
    }

    pub fn restore(&mut self, state: PersistedState) {
        self.active_view = state.active_view;
        for page in &mut self.pages {
            if let Some(columns) = state.hidden_columns.get(page.view().title()) {
                page.restore_hidden_columns(columns.clone());
            }
        }
    }

    pub fn persisted(&self) -> PersistedState {
        PersistedState {
            active_view: self.active_view,
            hidden_columns: self
                .pages
                .iter()
                .map(|p| (p.view().title().to_string(), p.hidden_columns()))
                .filter(|(_, columns)| !columns.is_empty())
                .collect(),
        }
    }
}
