//! Garage Admin TUI entry point.

use crossterm::{
    event::{self, Event as CrosstermEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use garage_client::{CacheConfig, DataClient, FileCredentialStore, QueryCache, ReqwestTransport};
use garage_tui::commands::PageContext;
use garage_tui::config::TuiConfig;
use garage_tui::error::TuiError;
use garage_tui::events::{spawn_cache_forwarder, TuiEvent};
use garage_tui::notifications::Notification;
use garage_tui::persistence;
use garage_tui::state::App;
use garage_tui::views::render_view;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<(), TuiError> {
    let config = TuiConfig::load()?;
    garage_tui::logging::init(&config.log_path)?;

    let credentials = Arc::new(FileCredentialStore::new(config.credentials_path.clone()));
    let transport = Arc::new(ReqwestTransport::new(config.request_timeout())?);
    let cache = Arc::new(QueryCache::with_config(CacheConfig {
        max_age: Some(config.refresh_interval()),
    }));
    let client = DataClient::new(config.api_base_url.clone(), transport, credentials, cache.clone())
        .with_retry(config.retry_policy());

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<TuiEvent>();
    let ctx = PageContext {
        client,
        events: event_tx.clone(),
        export_dir: config.export_dir.clone(),
        format: config.document_format(),
        page_size: config.page_size,
    };

    let mut app = App::new(config, ctx);
    match persistence::load(&app.config.persistence_path) {
        Ok(Some(state)) => app.restore(state),
        Ok(None) => {}
        Err(err) => {
            tracing::warn!(error = %err, "Ignoring unreadable UI state");
            app.notify(Notification::error(format!("UI state not restored: {}", err)));
        }
    }
    tracing::info!(base_url = %app.config.api_base_url, "Starting");

    let mut terminal = setup_terminal()?;
    let _guard = TerminalGuard;

    spawn_input_reader(event_tx.clone());
    let forwarder = spawn_cache_forwarder(&cache, event_tx);

    let mut ticker = tokio::time::interval(app.config.refresh_interval());

    loop {
        terminal.draw(|f| render_view(f, &app))?;

        let event = tokio::select! {
            _ = ticker.tick() => TuiEvent::Tick,
            Some(event) = event_rx.recv() => event,
        };
        if app.handle_event(event).await {
            break;
        }
    }

    forwarder.abort();
    if let Err(err) = persistence::save(&app.config.persistence_path, &app.persisted()) {
        tracing::warn!(error = %err, "Failed to save UI state");
    }
    tracing::info!("Stopped");
    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, TuiError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen);
    }
}

fn spawn_input_reader(sender: mpsc::UnboundedSender<TuiEvent>) {
    std::thread::spawn(move || loop {
        if let Ok(true) = event::poll(Duration::from_millis(200)) {
            let sent = match event::read() {
                Ok(CrosstermEvent::Key(key)) => sender.send(TuiEvent::Input(key)),
                Ok(CrosstermEvent::Resize(width, height)) => {
                    sender.send(TuiEvent::Resize { width, height })
                }
                _ => Ok(()),
            };
            if sent.is_err() {
                break;
            }
        }
    });
}
