//! Core record structures
//!
//! Field names follow the wire format of the garage REST API. Identifiers
//! arrive as either `_id` or `id`; numeric fields tolerate numeric strings
//! because older API revisions serialize prices as text.

use crate::{BookingStatus, PaymentStatus, RecordId, Timestamp, UserRole};
use serde::{Deserialize, Deserializer, Serialize};

/// A service offered by the garage (oil change, tyre swap, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    #[serde(alias = "_id")]
    pub id: RecordId,
    pub service_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(deserialize_with = "de_number")]
    pub price: f64,
    /// Estimated duration in minutes.
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<Timestamp>,
}

/// Payload for creating a service. The server assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewService {
    pub service_name: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
}

/// A customer vehicle registered with the garage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    #[serde(alias = "_id")]
    pub id: RecordId,
    pub make: String,
    pub model: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(alias = "plateNumber")]
    pub plate_number: String,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewVehicle {
    pub make: String,
    pub model: String,
    pub plate_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

/// An account on the platform (admin, mechanic or customer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(alias = "_id")]
    pub id: RecordId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// A payment transaction, served from `/api/v1/payments`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(alias = "_id")]
    pub id: RecordId,
    #[serde(deserialize_with = "de_number")]
    pub amount: f64,
    #[serde(default)]
    pub status: PaymentStatus,
    #[serde(default, alias = "paymentMethod")]
    pub payment_method: Option<String>,
    #[serde(default, alias = "customerName")]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "serviceName")]
    pub service_name: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<Timestamp>,
}

/// A customer's appointment for a service on a vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    #[serde(alias = "_id")]
    pub id: RecordId,
    #[serde(alias = "customerName")]
    pub customer_name: String,
    #[serde(default)]
    pub vehicle: Option<String>,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default, alias = "bookingDate")]
    pub booking_date: Option<Timestamp>,
    #[serde(default)]
    pub status: BookingStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBooking {
    pub customer_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_date: Option<Timestamp>,
}

/// Assignment of a booking to a mechanic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assign {
    #[serde(alias = "_id")]
    pub id: RecordId,
    #[serde(alias = "bookingId")]
    pub booking_id: RecordId,
    pub mechanic: String,
    #[serde(default)]
    pub status: BookingStatus,
    #[serde(default, alias = "assignedAt")]
    pub assigned_at: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAssign {
    pub booking_id: RecordId,
    pub mechanic: String,
}

/// A stocked part or consumable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    #[serde(alias = "_id")]
    pub id: RecordId,
    #[serde(alias = "itemName")]
    pub item_name: String,
    #[serde(default)]
    pub quantity: i64,
    #[serde(alias = "unitPrice", deserialize_with = "de_number")]
    pub unit_price: f64,
    #[serde(default)]
    pub supplier: Option<String>,
}

impl InventoryItem {
    pub fn stock_value(&self) -> f64 {
        self.quantity as f64 * self.unit_price
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewInventoryItem {
    pub item_name: String,
    pub quantity: i64,
    pub unit_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
}

/// One row of `/api/v1/services/get/report`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceReportRow {
    pub service_name: String,
    #[serde(default)]
    pub bookings: u64,
    #[serde(default, deserialize_with = "de_number")]
    pub revenue: f64,
}

/// The signed-in user persisted beside the token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(alias = "_id")]
    pub id: RecordId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: UserRole,
}

fn de_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(f64),
        Text(String),
    }

    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(n) => Ok(n),
        NumberOrText::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| serde::de::Error::custom(format!("invalid number '{}': {}", s, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn service_accepts_mongo_style_id_and_text_price() {
        let service: Service = serde_json::from_value(json!({
            "_id": "s1",
            "service_name": "Oil Change",
            "price": "25.50"
        }))
        .unwrap();
        assert_eq!(service.id, "s1");
        assert_eq!(service.price, 25.5);
        assert!(service.description.is_none());
    }

    #[test]
    fn transaction_defaults_to_pending() {
        let tx: Transaction = serde_json::from_value(json!({
            "id": "t1",
            "amount": 40
        }))
        .unwrap();
        assert_eq!(tx.status, PaymentStatus::Pending);
        assert_eq!(tx.amount, 40.0);
    }

    #[test]
    fn new_service_skips_absent_optionals() {
        let body = serde_json::to_value(NewService {
            service_name: "Oil Change".to_string(),
            price: 25.0,
            description: None,
            duration: None,
        })
        .unwrap();
        assert_eq!(body, json!({"service_name": "Oil Change", "price": 25.0}));
    }

    #[test]
    fn inventory_stock_value() {
        let item = InventoryItem {
            id: "i1".to_string(),
            item_name: "Filter".to_string(),
            quantity: 4,
            unit_price: 2.5,
            supplier: None,
        };
        assert_eq!(item.stock_value(), 10.0);
    }
}
