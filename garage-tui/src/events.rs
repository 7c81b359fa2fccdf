//! Event types for the TUI event loop.

use crate::notifications::Notification;
use crossterm::event::KeyEvent;
use garage_client::{CacheEvent, QueryCache};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};

#[derive(Debug, Clone)]
pub enum TuiEvent {
    Input(KeyEvent),
    Tick,
    Resize { width: u16, height: u16 },
    Notify(Notification),
    Cache(CacheEvent),
}

/// Forward cache events into the UI loop until either side goes away.
pub fn spawn_cache_forwarder(
    cache: &Arc<QueryCache>,
    sender: mpsc::UnboundedSender<TuiEvent>,
) -> tokio::task::JoinHandle<()> {
    let mut events = cache.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    if sender.send(TuiEvent::Cache(event)).is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "UI fell behind cache events");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}
