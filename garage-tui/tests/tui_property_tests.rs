use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use garage_client::{DataClient, Method};
use garage_core::report::DocumentFormat;
use garage_core::{ResourceKind, Service, Vehicle};
use garage_test_utils::fixtures::{self, ADMIN_TOKEN};
use garage_test_utils::{generators, MockServer};
use garage_tui::commands::{delete_records, PageContext};
use garage_tui::config::{ConfigError, TuiConfig};
use garage_tui::events::TuiEvent;
use garage_tui::keys::{map_key, Action};
use garage_tui::notifications::NotificationLevel;
use garage_tui::table::{HeaderCheck, SortDirection, TableConfig, TableView};
use garage_tui::traits::Page;
use garage_tui::views::{services, vehicles, ResourcePage};
use proptest::prelude::*;
use std::sync::Arc;
use tokio::sync::mpsc;

const VALID_CONFIG: &str = r#"
api_base_url = "https://garage.example.com"
request_timeout_ms = 5000
refresh_interval_ms = 30000
credentials_path = "/tmp/garage/credentials.json"
persistence_path = "/tmp/garage/state.json"
export_dir = "/tmp/garage/exports"
log_path = "/tmp/garage/tui.log"

[retry]
max_attempts = 2
backoff_ms = 100
"#;

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn context(
    server: &Arc<MockServer>,
    credentials: Arc<dyn garage_client::CredentialStore>,
    export_dir: &std::path::Path,
) -> (PageContext, mpsc::UnboundedReceiver<TuiEvent>) {
    let (events, rx) = mpsc::unbounded_channel();
    let ctx = PageContext {
        client: fixtures::client(server, credentials),
        events,
        export_dir: export_dir.to_path_buf(),
        format: DocumentFormat::default(),
        page_size: 10,
    };
    (ctx, rx)
}

fn service_table(rows: Vec<Service>, page_size: usize) -> TableView<Service> {
    let config = TableConfig::new(services::columns(&DocumentFormat::default()))
        .filter_on("service_name", "Filter services...")
        .page_size(page_size);
    TableView::new(config).with_data(rows)
}

// ============================================================================
// CONFIG AND KEYS
// ============================================================================

#[test]
fn config_applies_defaults() {
    let config = TuiConfig::from_toml(VALID_CONFIG).unwrap();
    assert_eq!(config.page_size, 10);
    assert_eq!(config.currency_symbol, "$");
    assert_eq!(config.retry_policy().max_attempts, 2);
}

#[test]
fn config_rejects_bad_values() {
    let bad_url = VALID_CONFIG.replace("https://garage.example.com", "garage.example.com");
    assert!(matches!(
        TuiConfig::from_toml(&bad_url),
        Err(ConfigError::InvalidValue { field: "api_base_url", .. })
    ));

    let zero_page = format!("page_size = 0\n{}", VALID_CONFIG);
    assert!(matches!(
        TuiConfig::from_toml(&zero_page),
        Err(ConfigError::InvalidValue { field: "page_size", .. })
    ));

    let unknown = format!("theme = \"dark\"\n{}", VALID_CONFIG);
    assert!(matches!(
        TuiConfig::from_toml(&unknown),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn keys_map_to_actions() {
    assert_eq!(map_key(key(KeyCode::Char('q'))), Some(Action::Quit));
    assert_eq!(map_key(key(KeyCode::Char('/'))), Some(Action::Filter));
    assert_eq!(map_key(key(KeyCode::Char(' '))), Some(Action::ToggleRow));
    assert_eq!(map_key(key(KeyCode::Char('3'))), Some(Action::SwitchView(2)));
    assert_eq!(
        map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
        Some(Action::Quit)
    );
}

// ============================================================================
// TABLE BEHAVIOR
// ============================================================================

#[test]
fn header_check_tracks_page_selection() {
    let mut table = service_table(fixtures::sample_services(), 10);
    assert_eq!(table.header_check(), HeaderCheck::Unchecked);

    table.toggle_page_selection();
    assert_eq!(table.header_check(), HeaderCheck::Checked);

    table.toggle_row("s2");
    assert_eq!(table.header_check(), HeaderCheck::Indeterminate);

    table.toggle_page_selection();
    assert_eq!(table.header_check(), HeaderCheck::Checked);
    table.toggle_page_selection();
    assert_eq!(table.header_check(), HeaderCheck::Unchecked);
    assert!(table.selected_rows().is_empty());
}

#[test]
fn price_sorts_numerically() {
    let mut table = service_table(
        vec![
            fixtures::service("a", "Nine", 9.0),
            fixtures::service("b", "Hundred", 100.0),
            fixtures::service("c", "Twenty", 20.0),
        ],
        10,
    );
    table.cycle_sort("price");
    let ids: Vec<&str> = table.sorted_rows().iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "c", "b"]);
}

proptest! {
    #[test]
    fn filter_keeps_exactly_the_matches(rows in generators::arb_services(30), needle in "[a-z]{0,3}") {
        let mut table = service_table(rows.clone(), 10);
        table.set_filter(needle.clone());

        let expected: Vec<&str> = rows
            .iter()
            .filter(|s| s.service_name.to_lowercase().contains(&needle))
            .map(|s| s.id.as_str())
            .collect();
        let actual: Vec<&str> = table.filtered_rows().iter().map(|s| s.id.as_str()).collect();
        prop_assert_eq!(&actual, &expected);

        table.set_filter(needle.clone());
        let again: Vec<&str> = table.filtered_rows().iter().map(|s| s.id.as_str()).collect();
        prop_assert_eq!(again, expected);
    }

    #[test]
    fn sort_direction_orders_prices(rows in generators::arb_services(30)) {
        let mut table = service_table(rows, 10);

        table.cycle_sort("price");
        prop_assert_eq!(
            table.state().sort.as_ref().map(|s| s.direction),
            Some(SortDirection::Ascending)
        );
        let ascending: Vec<f64> = table.sorted_rows().iter().map(|s| s.price).collect();
        prop_assert!(ascending.windows(2).all(|w| w[0] <= w[1]));

        table.cycle_sort("price");
        let descending: Vec<f64> = table.sorted_rows().iter().map(|s| s.price).collect();
        prop_assert!(descending.windows(2).all(|w| w[0] >= w[1]));

        table.cycle_sort("price");
        prop_assert!(table.state().sort.is_none());
    }

    #[test]
    fn descending_reverses_ascending_for_distinct_prices(
        prices in prop::collection::hash_set(0u32..100_000, 0..30)
    ) {
        let rows: Vec<Service> = prices
            .iter()
            .enumerate()
            .map(|(i, cents)| fixtures::service(&format!("s{}", i), "Service", *cents as f64 / 100.0))
            .collect();
        let mut table = service_table(rows, 10);

        table.cycle_sort("price");
        let mut ascending: Vec<String> = table.sorted_rows().iter().map(|s| s.id.clone()).collect();
        table.cycle_sort("price");
        let descending: Vec<String> = table.sorted_rows().iter().map(|s| s.id.clone()).collect();

        ascending.reverse();
        prop_assert_eq!(descending, ascending);
    }

    #[test]
    fn pages_cover_every_row_once(rows in generators::arb_services(40), size in 1usize..8) {
        let mut table = service_table(rows.clone(), size);
        let mut seen = Vec::new();
        for _ in 0..table.page_count() {
            seen.extend(table.page_rows().iter().map(|s| s.id.clone()));
            table.next_page();
        }
        let expected: Vec<String> = rows.iter().map(|s| s.id.clone()).collect();
        prop_assert_eq!(seen, expected);
        prop_assert!(table.state().page < table.page_count());
    }
}

// ============================================================================
// PAGES AGAINST THE MOCK SERVER
// ============================================================================

#[tokio::test]
async fn services_page_loads_rows() {
    let server = fixtures::seeded_server();
    let dir = tempfile::tempdir().unwrap();
    let (ctx, _rx) = context(&server, fixtures::admin_credentials(), dir.path());

    let mut page = services::page(&ctx);
    assert!(!page.is_loaded());
    page.reload(&ctx, false).await;

    assert!(page.is_loaded());
    assert!(page.error().is_none());
    assert_eq!(page.table().data().len(), 3);
    assert_eq!(server.request_count(Method::Get, "/api/v1/services"), 1);
}

#[tokio::test]
async fn add_form_posts_and_marks_list_stale() {
    let server = fixtures::seeded_server();
    let dir = tempfile::tempdir().unwrap();
    let (ctx, mut rx) = context(&server, fixtures::admin_credentials(), dir.path());

    let mut page = services::page(&ctx);
    page.reload(&ctx, false).await;

    assert!(page.handle_action(Action::NewItem, &ctx).await);
    assert!(page.captures_text());
    for c in "Oil Change".chars() {
        page.handle_text(key(KeyCode::Char(c)), &ctx).await;
    }
    page.handle_text(key(KeyCode::Tab), &ctx).await;
    for c in "25".chars() {
        page.handle_text(key(KeyCode::Char(c)), &ctx).await;
    }
    page.handle_text(key(KeyCode::Enter), &ctx).await;

    assert!(!page.captures_text());
    assert_eq!(server.request_count(Method::Post, "/api/v1/services"), 1);
    assert_eq!(server.records(ResourceKind::Service).len(), 4);
    assert!(ctx.client.peek(&DataClient::list_key::<Service>()).is_stale);

    let mut added = false;
    while let Ok(event) = rx.try_recv() {
        if let TuiEvent::Notify(note) = event {
            added |= note.level == NotificationLevel::Success && note.message.contains("added");
        }
    }
    assert!(added);

    page.reload(&ctx, false).await;
    assert_eq!(page.table().data().len(), 4);
}

#[tokio::test]
async fn invalid_form_sends_nothing() {
    let server = fixtures::seeded_server();
    let dir = tempfile::tempdir().unwrap();
    let (ctx, mut rx) = context(&server, fixtures::admin_credentials(), dir.path());

    let mut page = services::page(&ctx);
    page.handle_action(Action::NewItem, &ctx).await;
    page.handle_text(key(KeyCode::Enter), &ctx).await;

    assert!(page.captures_text());
    assert_eq!(server.request_count(Method::Post, "/api/v1/services"), 0);
    match rx.try_recv() {
        Ok(TuiEvent::Notify(note)) => {
            assert_eq!(note.level, NotificationLevel::Error);
            assert!(note.message.contains("required"));
        }
        other => panic!("expected an error notification, got {:?}", other.is_ok()),
    }
}

#[tokio::test]
async fn deleted_vehicle_disappears_after_refresh() {
    let server = fixtures::seeded_server();
    let dir = tempfile::tempdir().unwrap();
    let (ctx, _rx) = context(&server, fixtures::admin_credentials(), dir.path());

    let mut page: ResourcePage<Vehicle> = vehicles::page(&ctx);
    page.reload(&ctx, false).await;
    assert_eq!(page.table().data().len(), 2);

    let (deleted, failures) =
        delete_records(&ctx.client, ResourceKind::Vehicle.endpoint(), &["v1".to_string()]).await;
    assert_eq!(deleted, 1);
    assert!(failures.is_empty());
    assert_eq!(server.request_count(Method::Delete, "/api/v1/vehicles/v1"), 1);

    page.reload(&ctx, false).await;
    let ids: Vec<&str> = page.table().data().iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, vec!["v2"]);
}

#[tokio::test]
async fn unknown_record_delete_is_reported() {
    let server = fixtures::seeded_server();
    let dir = tempfile::tempdir().unwrap();
    let (ctx, _rx) = context(&server, fixtures::admin_credentials(), dir.path());

    let (deleted, failures) =
        delete_records(&ctx.client, ResourceKind::Vehicle.endpoint(), &["ghost".to_string()]).await;
    assert_eq!(deleted, 0);
    assert_eq!(failures.len(), 1);
    assert!(failures[0].starts_with("ghost"));
}

#[tokio::test]
async fn rejected_session_shows_inline_error() {
    let server = fixtures::seeded_server();
    server.require_token(ADMIN_TOKEN);
    let dir = tempfile::tempdir().unwrap();
    let (ctx, _rx) = context(&server, fixtures::anonymous_credentials(), dir.path());

    let mut page = services::page(&ctx);
    page.reload(&ctx, false).await;

    assert!(page.is_loaded());
    assert!(page.error().is_some());
    assert!(page.table().data().is_empty());
}

#[tokio::test]
async fn export_all_writes_rows() {
    let server = fixtures::seeded_server();
    let dir = tempfile::tempdir().unwrap();
    let (ctx, _rx) = context(&server, fixtures::admin_credentials(), dir.path());

    let mut page = services::page(&ctx);
    page.reload(&ctx, false).await;
    page.handle_action(Action::ExportAll, &ctx).await;

    let files: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(files.len(), 1);
    let rows: Vec<Service> =
        serde_json::from_str(&std::fs::read_to_string(&files[0]).unwrap()).unwrap();
    assert_eq!(rows.len(), 3);
}
