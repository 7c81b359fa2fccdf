//! Enum types for garage records

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// PAYMENT STATUS
// ============================================================================

/// Settlement state of a payment transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum PaymentStatus {
    Paid,
    #[default]
    Pending,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn is_paid(&self) -> bool {
        matches!(self, PaymentStatus::Paid)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::Pending => "pending",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
        };
        f.write_str(label)
    }
}

impl FromStr for PaymentStatus {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "paid" | "success" | "completed" => Ok(PaymentStatus::Paid),
            "pending" => Ok(PaymentStatus::Pending),
            "failed" => Ok(PaymentStatus::Failed),
            "refunded" => Ok(PaymentStatus::Refunded),
            other => Err(EnumParseError::new("payment status", other)),
        }
    }
}

// ============================================================================
// BOOKING STATUS
// ============================================================================

/// Lifecycle of a customer booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::InProgress => "inprogress",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        };
        f.write_str(label)
    }
}

impl FromStr for BookingStatus {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "inprogress" => Ok(BookingStatus::InProgress),
            "completed" => Ok(BookingStatus::Completed),
            "cancelled" | "canceled" => Ok(BookingStatus::Cancelled),
            _ => Err(EnumParseError::new("booking status", s)),
        }
    }
}

// ============================================================================
// USER ROLE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum UserRole {
    Admin,
    Mechanic,
    #[default]
    Customer,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UserRole::Admin => "admin",
            UserRole::Mechanic => "mechanic",
            UserRole::Customer => "customer",
        };
        f.write_str(label)
    }
}

impl FromStr for UserRole {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(UserRole::Admin),
            "mechanic" => Ok(UserRole::Mechanic),
            "customer" | "user" => Ok(UserRole::Customer),
            other => Err(EnumParseError::new("user role", other)),
        }
    }
}

/// Wire values go through `FromStr` so server aliases and any casing decode.
macro_rules! impl_try_from_string {
    ($($ty:ty),*) => {
        $(
            impl TryFrom<String> for $ty {
                type Error = EnumParseError;

                fn try_from(value: String) -> Result<Self, Self::Error> {
                    value.parse()
                }
            }
        )*
    };
}

impl_try_from_string!(PaymentStatus, BookingStatus, UserRole);

/// Error returned when a free-text value does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumParseError {
    kind: &'static str,
    value: String,
}

impl EnumParseError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

impl fmt::Display for EnumParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {}: {}", self.kind, self.value)
    }
}

impl std::error::Error for EnumParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_status_accepts_server_aliases() {
        assert_eq!("success".parse::<PaymentStatus>(), Ok(PaymentStatus::Paid));
        assert_eq!(" Paid ".parse::<PaymentStatus>(), Ok(PaymentStatus::Paid));
        assert!("bogus".parse::<PaymentStatus>().is_err());
    }

    #[test]
    fn booking_status_ignores_separators() {
        assert_eq!(
            "in-progress".parse::<BookingStatus>(),
            Ok(BookingStatus::InProgress)
        );
        assert_eq!(
            "canceled".parse::<BookingStatus>(),
            Ok(BookingStatus::Cancelled)
        );
    }

    #[test]
    fn wire_values_decode_through_aliases() {
        let status: PaymentStatus = serde_json::from_str(r#""Completed""#).unwrap();
        assert_eq!(status, PaymentStatus::Paid);
        let booking: BookingStatus = serde_json::from_str(r#""in-progress""#).unwrap();
        assert_eq!(booking, BookingStatus::InProgress);
        let role: UserRole = serde_json::from_str(r#""user""#).unwrap();
        assert_eq!(role, UserRole::Customer);
        assert!(serde_json::from_str::<PaymentStatus>(r#""bogus""#).is_err());
        assert_eq!(
            serde_json::to_string(&BookingStatus::InProgress).unwrap(),
            r#""inprogress""#
        );
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for role in [UserRole::Admin, UserRole::Mechanic, UserRole::Customer] {
            assert_eq!(role.to_string().parse::<UserRole>(), Ok(role));
        }
    }
}
