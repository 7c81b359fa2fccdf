//! Garage Admin Test Utilities
//!
//! Shared test infrastructure for the workspace:
//! - An in-memory REST server implementing [`Transport`]
//! - Proptest generators for record types
//! - Fixtures for common scenarios
//! - Assertions for client results and cache state

pub use garage_client::{
    ClientError, ClientResult, CredentialStore, DataClient, HttpRequest, HttpResponse,
    MemoryCredentialStore, Method, QueryCache, QueryKey, QueryState, RetryPolicy, Transport,
    REPORT_ENDPOINT,
};
pub use garage_core::{
    Assign, Booking, BookingStatus, InventoryItem, PaymentStatus, ResourceKind, Service,
    ServiceReportRow, SessionUser, Timestamp, Transaction, User, UserRole, Vehicle,
};

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

// ============================================================================
// MOCK SERVER
// ============================================================================

/// In-memory stand-in for the garage REST API.
///
/// Collections live under their endpoint paths and answer with the same list
/// envelope as the real server. Every request is recorded so tests can
/// assert on request counts, headers, and bodies.
pub struct MockServer {
    state: Mutex<MockState>,
}

#[derive(Default)]
struct MockState {
    collections: HashMap<ResourceKind, Vec<Value>>,
    report: Vec<Value>,
    requests: Vec<HttpRequest>,
    queued: HashMap<String, VecDeque<HttpResponse>>,
    required_token: Option<String>,
    transport_failures: u32,
    delay: Duration,
    next_id: u64,
}

impl Default for MockServer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockServer {
    pub const BASE_URL: &'static str = "http://garage.test";

    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState::default()),
        }
    }

    /// Replace the records of `kind`.
    pub fn seed<T: Serialize>(&self, kind: ResourceKind, records: &[T]) {
        let values = records
            .iter()
            .filter_map(|r| serde_json::to_value(r).ok())
            .collect();
        self.lock().collections.insert(kind, values);
    }

    pub fn seed_raw(&self, kind: ResourceKind, records: Vec<Value>) {
        self.lock().collections.insert(kind, records);
    }

    pub fn set_report<T: Serialize>(&self, rows: &[T]) {
        self.lock().report = rows
            .iter()
            .filter_map(|r| serde_json::to_value(r).ok())
            .collect();
    }

    pub fn records(&self, kind: ResourceKind) -> Vec<Value> {
        self.lock()
            .collections
            .get(&kind)
            .cloned()
            .unwrap_or_default()
    }

    /// Reject requests whose `Authorization` header is not `Token {token}`.
    pub fn require_token(&self, token: impl Into<String>) {
        self.lock().required_token = Some(token.into());
    }

    pub fn set_delay(&self, delay: Duration) {
        self.lock().delay = delay;
    }

    /// Answer the next request to `path` with a canned response.
    pub fn queue_response(&self, path: impl Into<String>, status: u16, body: Value) {
        self.lock()
            .queued
            .entry(path.into())
            .or_default()
            .push_back(HttpResponse {
                status,
                body: body.to_string(),
            });
    }

    /// Fail the next `times` exchanges before they reach a handler.
    pub fn fail_transport(&self, times: u32) {
        self.lock().transport_failures = times;
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.lock().requests.clone()
    }

    pub fn request_count(&self, method: Method, path: &str) -> usize {
        self.lock()
            .requests
            .iter()
            .filter(|r| r.method == method && path_of(&r.url) == path)
            .count()
    }

    pub fn clear_requests(&self) {
        self.lock().requests.clear();
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn handle(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        let mut state = self.lock();
        state.requests.push(request.clone());

        if state.transport_failures > 0 {
            state.transport_failures -= 1;
            return Err(ClientError::Transport("connection reset".to_string()));
        }

        let path = path_of(&request.url).to_string();
        if let Some(response) = state.queued.get_mut(&path).and_then(VecDeque::pop_front) {
            return Ok(response);
        }

        if let Some(required) = &state.required_token {
            let expected = format!("Token {}", required);
            if request.authorization.as_deref() != Some(expected.as_str()) {
                return Ok(reply(
                    401,
                    json!({"status": "fail", "message": "Authentication required"}),
                ));
            }
        }

        if path == REPORT_ENDPOINT && request.method == Method::Get {
            return Ok(reply(
                200,
                json!({"status": "success", "report": state.report}),
            ));
        }

        for kind in ResourceKind::ALL {
            let endpoint = kind.endpoint();
            if path == endpoint {
                return Ok(state.collection_request(kind, &request));
            }
            if let Some(id) = path
                .strip_prefix(endpoint)
                .and_then(|rest| rest.strip_prefix('/'))
            {
                return Ok(state.record_request(kind, id, &request));
            }
        }

        Ok(reply(
            404,
            json!({"status": "fail", "message": format!("No route for {}", path)}),
        ))
    }
}

impl MockState {
    fn collection_request(&mut self, kind: ResourceKind, request: &HttpRequest) -> HttpResponse {
        match request.method {
            Method::Get => {
                let records = self.collections.get(&kind).cloned().unwrap_or_default();
                let mut envelope = Map::new();
                envelope.insert("status".to_string(), json!("success"));
                envelope.insert(kind.collection().to_string(), Value::Array(records));
                reply(200, Value::Object(envelope))
            }
            Method::Post => {
                let Some(Value::Object(mut record)) = request.body.clone() else {
                    return reply(400, json!({"status": "fail", "message": "Body must be an object"}));
                };
                if !record.contains_key("id") && !record.contains_key("_id") {
                    self.next_id += 1;
                    record.insert(
                        "_id".to_string(),
                        json!(format!("{}-{}", kind.collection(), self.next_id)),
                    );
                }
                let record = Value::Object(record);
                self.collections
                    .entry(kind)
                    .or_default()
                    .push(record.clone());
                reply(201, json!({"status": "success", "data": record}))
            }
            _ => reply(405, json!({"status": "fail", "message": "Method not allowed"})),
        }
    }

    fn record_request(&mut self, kind: ResourceKind, id: &str, request: &HttpRequest) -> HttpResponse {
        let records = self.collections.entry(kind).or_default();
        let Some(index) = records.iter().position(|r| record_id(r) == Some(id)) else {
            return reply(404, json!({"status": "fail", "message": "Record not found"}));
        };

        match request.method {
            Method::Get => reply(200, json!({"status": "success", "data": records[index]})),
            Method::Put => {
                if let (Some(Value::Object(patch)), Value::Object(existing)) =
                    (&request.body, &mut records[index])
                {
                    for (field, value) in patch {
                        existing.insert(field.clone(), value.clone());
                    }
                }
                reply(200, json!({"status": "success", "data": records[index]}))
            }
            Method::Delete => {
                records.remove(index);
                reply(200, json!({"status": "success", "message": "Deleted"}))
            }
            Method::Post => reply(405, json!({"status": "fail", "message": "Method not allowed"})),
        }
    }
}

#[async_trait]
impl Transport for MockServer {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        let delay = self.lock().delay;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.handle(request)
    }
}

fn path_of(url: &str) -> &str {
    url.strip_prefix(MockServer::BASE_URL).unwrap_or(url)
}

fn record_id(record: &Value) -> Option<&str> {
    record
        .get("id")
        .or_else(|| record.get("_id"))
        .and_then(Value::as_str)
}

fn reply(status: u16, body: Value) -> HttpResponse {
    HttpResponse {
        status,
        body: body.to_string(),
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for garage record types.

    use super::*;
    use proptest::prelude::*;

    pub fn arb_record_id() -> impl Strategy<Value = String> {
        "[a-f0-9]{12}"
    }

    /// Timestamps between 2020 and 2030.
    pub fn arb_timestamp() -> impl Strategy<Value = Timestamp> {
        (1577836800i64..1893456000i64).prop_map(|secs| {
            chrono::DateTime::from_timestamp(secs, 0).unwrap_or_else(Utc::now)
        })
    }

    pub fn arb_payment_status() -> impl Strategy<Value = PaymentStatus> {
        prop_oneof![
            Just(PaymentStatus::Paid),
            Just(PaymentStatus::Pending),
            Just(PaymentStatus::Failed),
            Just(PaymentStatus::Refunded),
        ]
    }

    pub fn arb_booking_status() -> impl Strategy<Value = BookingStatus> {
        prop_oneof![
            Just(BookingStatus::Pending),
            Just(BookingStatus::Confirmed),
            Just(BookingStatus::InProgress),
            Just(BookingStatus::Completed),
            Just(BookingStatus::Cancelled),
        ]
    }

    pub fn arb_user_role() -> impl Strategy<Value = UserRole> {
        prop_oneof![
            Just(UserRole::Admin),
            Just(UserRole::Mechanic),
            Just(UserRole::Customer),
        ]
    }

    /// Whole-cent amounts up to 10 000.
    pub fn arb_amount() -> impl Strategy<Value = f64> {
        (0u32..1_000_000).prop_map(|cents| cents as f64 / 100.0)
    }

    pub fn arb_service() -> impl Strategy<Value = Service> {
        (
            arb_record_id(),
            "[A-Z][a-z]{2,10}( [A-Z][a-z]{2,8})?",
            proptest::option::of("[a-z ]{0,30}"),
            arb_amount(),
            proptest::option::of(15u32..480),
            proptest::option::of(arb_timestamp()),
        )
            .prop_map(
                |(id, service_name, description, price, duration, created_at)| Service {
                    id,
                    service_name,
                    description,
                    price,
                    duration,
                    created_at,
                },
            )
    }

    pub fn arb_vehicle() -> impl Strategy<Value = Vehicle> {
        (
            arb_record_id(),
            "(Toyota|Honda|Ford|Mazda|Volvo)",
            "[A-Z][a-z]{2,8}",
            proptest::option::of(1990i32..2026),
            "[A-Z]{3}-[0-9]{3}",
            proptest::option::of("[A-Z][a-z]{2,8}"),
        )
            .prop_map(|(id, make, model, year, plate_number, owner)| Vehicle {
                id,
                make,
                model,
                year,
                plate_number,
                owner,
                created_at: None,
            })
    }

    pub fn arb_transaction() -> impl Strategy<Value = Transaction> {
        (
            arb_record_id(),
            arb_amount(),
            arb_payment_status(),
            proptest::option::of("[A-Z][a-z]{2,8}"),
            proptest::option::of(arb_timestamp()),
        )
            .prop_map(|(id, amount, status, customer_name, created_at)| Transaction {
                id,
                amount,
                status,
                payment_method: Some("card".to_string()),
                customer_name,
                email: None,
                service_name: None,
                reference: None,
                created_at,
            })
    }

    pub fn arb_inventory_item() -> impl Strategy<Value = InventoryItem> {
        (
            arb_record_id(),
            "[A-Z][a-z]{2,12}",
            0i64..500,
            arb_amount(),
        )
            .prop_map(|(id, item_name, quantity, unit_price)| InventoryItem {
                id,
                item_name,
                quantity,
                unit_price,
                supplier: None,
            })
    }

    /// Services with distinct ids (`svc-0`, `svc-1`, ...).
    pub fn arb_services(max: usize) -> impl Strategy<Value = Vec<Service>> {
        prop::collection::vec(arb_service(), 0..=max).prop_map(|mut services| {
            for (i, service) in services.iter_mut().enumerate() {
                service.id = format!("svc-{}", i);
            }
            services
        })
    }

    /// Transactions with distinct ids (`txn-0`, `txn-1`, ...).
    pub fn arb_transactions(max: usize) -> impl Strategy<Value = Vec<Transaction>> {
        prop::collection::vec(arb_transaction(), 0..=max).prop_map(|mut transactions| {
            for (i, transaction) in transactions.iter_mut().enumerate() {
                transaction.id = format!("txn-{}", i);
            }
            transactions
        })
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built records and clients for common scenarios.

    use super::*;

    pub const ADMIN_TOKEN: &str = "test-admin-token";

    pub fn admin_user() -> SessionUser {
        SessionUser {
            id: "user-admin".to_string(),
            name: "Garage Admin".to_string(),
            email: "admin@garage.test".to_string(),
            role: UserRole::Admin,
        }
    }

    pub fn admin_credentials() -> Arc<MemoryCredentialStore> {
        Arc::new(MemoryCredentialStore::with_session(ADMIN_TOKEN, admin_user()))
    }

    pub fn anonymous_credentials() -> Arc<MemoryCredentialStore> {
        Arc::new(MemoryCredentialStore::new())
    }

    /// Client wired to `server` with a fresh cache and no retries.
    pub fn client(server: &Arc<MockServer>, credentials: Arc<dyn CredentialStore>) -> DataClient {
        DataClient::new(
            MockServer::BASE_URL,
            server.clone(),
            credentials,
            Arc::new(QueryCache::new()),
        )
        .with_retry(RetryPolicy::none())
    }

    pub fn service(id: &str, name: &str, price: f64) -> Service {
        Service {
            id: id.to_string(),
            service_name: name.to_string(),
            description: None,
            price,
            duration: None,
            created_at: None,
        }
    }

    pub fn sample_services() -> Vec<Service> {
        vec![
            service("s1", "Brake Check", 40.0),
            service("s2", "Tyre Rotation", 30.0),
            service("s3", "Engine Tune", 120.0),
        ]
    }

    pub fn vehicle(id: &str, make: &str, model: &str, plate: &str) -> Vehicle {
        Vehicle {
            id: id.to_string(),
            make: make.to_string(),
            model: model.to_string(),
            year: None,
            plate_number: plate.to_string(),
            owner: None,
            created_at: None,
        }
    }

    pub fn sample_vehicles() -> Vec<Vehicle> {
        vec![
            vehicle("v1", "Toyota", "Corolla", "ABC-123"),
            vehicle("v2", "Honda", "Civic", "XYZ-789"),
        ]
    }

    pub fn transaction(id: &str, amount: f64, status: PaymentStatus) -> Transaction {
        Transaction {
            id: id.to_string(),
            amount,
            status,
            payment_method: Some("card".to_string()),
            customer_name: Some("Jane Doe".to_string()),
            email: Some("jane@garage.test".to_string()),
            service_name: Some("Brake Check".to_string()),
            reference: Some(format!("REF-{}", id)),
            created_at: None,
        }
    }

    /// Two paid (100 + 50) and one pending (25) transaction.
    pub fn sample_transactions() -> Vec<Transaction> {
        vec![
            transaction("t1", 100.0, PaymentStatus::Paid),
            transaction("t2", 50.0, PaymentStatus::Paid),
            transaction("t3", 25.0, PaymentStatus::Pending),
        ]
    }

    pub fn sample_bookings() -> Vec<Booking> {
        vec![Booking {
            id: "b1".to_string(),
            customer_name: "Jane Doe".to_string(),
            vehicle: Some("ABC-123".to_string()),
            service: Some("Brake Check".to_string()),
            booking_date: None,
            status: BookingStatus::Confirmed,
        }]
    }

    pub fn sample_inventory() -> Vec<InventoryItem> {
        vec![
            InventoryItem {
                id: "i1".to_string(),
                item_name: "Brake Pads".to_string(),
                quantity: 10,
                unit_price: 15.5,
                supplier: Some("PartsCo".to_string()),
            },
            InventoryItem {
                id: "i2".to_string(),
                item_name: "Oil Filter".to_string(),
                quantity: 4,
                unit_price: 8.0,
                supplier: None,
            },
        ]
    }

    pub fn sample_report() -> Vec<ServiceReportRow> {
        vec![
            ServiceReportRow {
                service_name: "Brake Check".to_string(),
                bookings: 3,
                revenue: 120.0,
            },
            ServiceReportRow {
                service_name: "Engine Tune".to_string(),
                bookings: 1,
                revenue: 120.0,
            },
        ]
    }

    /// Server seeded with every sample collection.
    pub fn seeded_server() -> Arc<MockServer> {
        let server = Arc::new(MockServer::new());
        server.seed(ResourceKind::Service, &sample_services());
        server.seed(ResourceKind::Vehicle, &sample_vehicles());
        server.seed(ResourceKind::Transaction, &sample_transactions());
        server.seed(ResourceKind::Booking, &sample_bookings());
        server.seed(ResourceKind::Inventory, &sample_inventory());
        server.set_report(&sample_report());
        server
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions for client results, cache state, and recorded requests.

    use super::*;

    #[track_caller]
    pub fn assert_ok<T: std::fmt::Debug>(result: &ClientResult<T>) {
        assert!(result.is_ok(), "Expected Ok, got Err: {:?}", result);
    }

    #[track_caller]
    pub fn assert_server_error<T: std::fmt::Debug>(result: &ClientResult<T>, status: u16) {
        match result {
            Err(ClientError::Server { status: s, .. }) => {
                assert_eq!(*s, status, "Wrong status in server error");
            }
            other => panic!("Expected server error {}, got: {:?}", status, other),
        }
    }

    #[track_caller]
    pub fn assert_unauthorized<T: std::fmt::Debug>(result: &ClientResult<T>) {
        match result {
            Err(err) if err.is_unauthorized() => {}
            other => panic!("Expected unauthorized error, got: {:?}", other),
        }
    }

    #[track_caller]
    pub fn assert_stale(state: &QueryState) {
        assert!(state.data.is_some(), "Expected a cached payload: {:?}", state);
        assert!(state.is_stale, "Expected stale entry: {:?}", state);
    }

    #[track_caller]
    pub fn assert_fresh(state: &QueryState) {
        assert!(state.data.is_some(), "Expected a cached payload: {:?}", state);
        assert!(!state.is_stale, "Expected fresh entry: {:?}", state);
        assert!(state.error.is_none(), "Unexpected error: {:?}", state.error);
    }

    #[track_caller]
    pub fn assert_authorized(request: &HttpRequest, token: &str) {
        assert_eq!(
            request.authorization.as_deref(),
            Some(format!("Token {}", token).as_str()),
            "Wrong Authorization header on {} {}",
            request.method,
            request.url
        );
    }

    #[track_caller]
    pub fn assert_anonymous(request: &HttpRequest) {
        assert!(
            request.authorization.is_none(),
            "Unexpected Authorization header on {} {}",
            request.method,
            request.url
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn get(path: &str) -> HttpRequest {
        HttpRequest {
            method: Method::Get,
            url: format!("{}{}", MockServer::BASE_URL, path),
            query: Vec::new(),
            authorization: None,
            body: None,
        }
    }

    fn body_of(response: HttpResponse) -> Value {
        serde_json::from_str(&response.body).unwrap()
    }

    #[test]
    fn test_list_envelope_uses_collection_field() {
        let server = fixtures::seeded_server();
        let response = server.handle(get("/api/v1/payments")).unwrap();
        assert_eq!(response.status, 200);
        let body = body_of(response);
        assert_eq!(body["status"], "success");
        assert_eq!(body["transactions"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_post_assigns_id_and_delete_removes() {
        let server = MockServer::new();
        let mut create = get("/api/v1/services");
        create.method = Method::Post;
        create.body = Some(json!({"service_name": "Oil Change", "price": 25}));
        let created = body_of(server.handle(create).unwrap());
        let id = created["data"]["_id"].as_str().unwrap().to_string();

        let mut delete = get(&format!("/api/v1/services/{}", id));
        delete.method = Method::Delete;
        assert_eq!(server.handle(delete).unwrap().status, 200);
        assert!(server.records(ResourceKind::Service).is_empty());
    }

    #[test]
    fn test_required_token_rejects_anonymous() {
        let server = fixtures::seeded_server();
        server.require_token(fixtures::ADMIN_TOKEN);
        assert_eq!(server.handle(get("/api/v1/services")).unwrap().status, 401);

        let mut authed = get("/api/v1/services");
        authed.authorization = Some(format!("Token {}", fixtures::ADMIN_TOKEN));
        assert_eq!(server.handle(authed).unwrap().status, 200);
    }

    #[test]
    fn test_queued_response_is_served_once() {
        let server = fixtures::seeded_server();
        server.queue_response("/api/v1/services", 500, json!({"message": "boom"}));
        assert_eq!(server.handle(get("/api/v1/services")).unwrap().status, 500);
        assert_eq!(server.handle(get("/api/v1/services")).unwrap().status, 200);
        assert_eq!(server.request_count(Method::Get, "/api/v1/services"), 2);
    }

    #[test]
    fn test_report_route_precedes_services_records() {
        let server = fixtures::seeded_server();
        let body = body_of(server.handle(get(REPORT_ENDPOINT)).unwrap());
        assert_eq!(body["report"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_assertion_server_error() {
        let result: ClientResult<()> = Err(ClientError::Server {
            status: 404,
            message: "missing".to_string(),
        });
        assertions::assert_server_error(&result, 404);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn prop_generated_services_have_distinct_ids(services in generators::arb_services(20)) {
            let ids: std::collections::HashSet<_> = services.iter().map(|s| s.id.clone()).collect();
            prop_assert_eq!(ids.len(), services.len());
        }

        #[test]
        fn prop_generated_amounts_are_non_negative(tx in generators::arb_transaction()) {
            prop_assert!(tx.amount >= 0.0);
            prop_assert!(tx.amount.is_finite());
        }
    }
}
