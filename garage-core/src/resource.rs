//! Resource descriptors and list-envelope decoding.
//!
//! Every collection endpoint answers with an object carrying a `status` field
//! and one array named after the resource:
//!
//! ```json
//! { "status": "success", "services": [ ... ] }
//! ```

use crate::{
    Assign, Booking, CoreError, CoreResult, InventoryItem, RecordId, Service, Transaction, User,
    Vehicle,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Discriminator for the resource collections the API exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Service,
    Vehicle,
    Booking,
    Assign,
    Inventory,
    Transaction,
    User,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 7] = [
        ResourceKind::Service,
        ResourceKind::Vehicle,
        ResourceKind::Booking,
        ResourceKind::Assign,
        ResourceKind::Inventory,
        ResourceKind::Transaction,
        ResourceKind::User,
    ];

    pub fn endpoint(&self) -> &'static str {
        match self {
            ResourceKind::Service => "/api/v1/services",
            ResourceKind::Vehicle => "/api/v1/vehicles",
            ResourceKind::Booking => "/api/v1/bookings",
            ResourceKind::Assign => "/api/v1/assigns",
            ResourceKind::Inventory => "/api/v1/inventory",
            ResourceKind::Transaction => "/api/v1/payments",
            ResourceKind::User => "/api/v1/users",
        }
    }

    /// Human-readable plural name.
    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::Service => "Services",
            ResourceKind::Vehicle => "Vehicles",
            ResourceKind::Booking => "Bookings",
            ResourceKind::Assign => "Assignments",
            ResourceKind::Inventory => "Inventory",
            ResourceKind::Transaction => "Transactions",
            ResourceKind::User => "Users",
        }
    }

    /// Name of the array field in a list response.
    pub fn collection(&self) -> &'static str {
        match self {
            ResourceKind::Service => "services",
            ResourceKind::Vehicle => "vehicles",
            ResourceKind::Booking => "bookings",
            ResourceKind::Assign => "assigns",
            ResourceKind::Inventory => "inventory",
            ResourceKind::Transaction => "transactions",
            ResourceKind::User => "users",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection())
    }
}

/// A server-owned record type reachable through one collection endpoint.
pub trait Resource: DeserializeOwned + Clone + Send + Sync + 'static {
    const KIND: ResourceKind;

    fn id(&self) -> &RecordId;
}

macro_rules! impl_resource {
    ($ty:ty, $kind:expr) => {
        impl Resource for $ty {
            const KIND: ResourceKind = $kind;

            fn id(&self) -> &RecordId {
                &self.id
            }
        }
    };
}

impl_resource!(Service, ResourceKind::Service);
impl_resource!(Vehicle, ResourceKind::Vehicle);
impl_resource!(Booking, ResourceKind::Booking);
impl_resource!(Assign, ResourceKind::Assign);
impl_resource!(InventoryItem, ResourceKind::Inventory);
impl_resource!(Transaction, ResourceKind::Transaction);
impl_resource!(User, ResourceKind::User);

/// Decode the resource-named array out of a list envelope.
///
/// A `status` other than `"success"` is reported as a server failure with the
/// envelope's `message` when present. A missing `status` is tolerated.
pub fn decode_list<R: Resource>(value: &Value) -> CoreResult<Vec<R>> {
    decode_collection(value, R::KIND.collection())
}

/// Decode an arbitrary named array out of a list envelope.
pub fn decode_collection<T: DeserializeOwned>(
    value: &Value,
    field: &'static str,
) -> CoreResult<Vec<T>> {
    let object = value.as_object().ok_or(CoreError::NotAnObject)?;

    if let Some(status) = object.get("status").and_then(Value::as_str) {
        if status != "success" {
            let message = object
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or(status)
                .to_string();
            return Err(CoreError::ServerFailure { message });
        }
    }

    let items = object
        .get(field)
        .ok_or(CoreError::MissingCollection { field })?;
    serde_json::from_value(items.clone()).map_err(|e| CoreError::Decode {
        resource: field,
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BookingStatus, PaymentStatus};
    use serde_json::json;

    #[test]
    fn decodes_named_collection() {
        let body = json!({
            "status": "success",
            "vehicles": [
                {"_id": "v1", "make": "Toyota", "model": "Corolla", "plate_number": "KAA 001A"}
            ]
        });
        let vehicles: Vec<Vehicle> = decode_list(&body).unwrap();
        assert_eq!(vehicles.len(), 1);
        assert_eq!(vehicles[0].id(), "v1");
    }

    #[test]
    fn transactions_live_under_payments_endpoint() {
        assert_eq!(Transaction::KIND.endpoint(), "/api/v1/payments");
        assert_eq!(Transaction::KIND.collection(), "transactions");
    }

    #[test]
    fn failure_status_surfaces_message() {
        let body = json!({"status": "fail", "message": "not allowed"});
        let err = decode_list::<Service>(&body).unwrap_err();
        assert_eq!(
            err,
            CoreError::ServerFailure {
                message: "not allowed".to_string()
            }
        );
    }

    #[test]
    fn missing_collection_is_an_error() {
        let body = json!({"status": "success"});
        let err = decode_list::<Booking>(&body).unwrap_err();
        assert_eq!(err, CoreError::MissingCollection { field: "bookings" });
    }

    #[test]
    fn server_status_aliases_do_not_break_the_list() {
        let body = json!({
            "status": "success",
            "transactions": [
                {"_id": "t1", "amount": 40, "status": "paid"},
                {"_id": "t2", "amount": "25.50", "status": "success"},
                {"_id": "t3", "amount": 10, "status": "Pending"}
            ]
        });
        let rows: Vec<Transaction> = decode_list(&body).unwrap();
        let statuses: Vec<PaymentStatus> = rows.iter().map(|t| t.status).collect();
        assert_eq!(
            statuses,
            vec![PaymentStatus::Paid, PaymentStatus::Paid, PaymentStatus::Pending]
        );

        let body = json!({
            "status": "success",
            "bookings": [{"_id": "b1", "customer_name": "Ann", "status": "in-progress"}]
        });
        let bookings: Vec<Booking> = decode_list(&body).unwrap();
        assert_eq!(bookings[0].status, BookingStatus::InProgress);
    }

    #[test]
    fn non_object_is_rejected() {
        assert_eq!(
            decode_list::<User>(&json!([])).unwrap_err(),
            CoreError::NotAnObject
        );
    }
}
