//! Garage Admin Core - Record Types
//!
//! Server-owned record shapes, the list envelope they travel in, and the pure
//! functions the client computes over them (validation, dashboard statistics,
//! document descriptions). No I/O lives here.

pub mod entities;
pub mod enums;
pub mod error;
pub mod identity;
pub mod report;
pub mod resource;
pub mod stats;
pub mod validation;

pub use entities::*;
pub use enums::*;
pub use error::{CoreError, CoreResult, ValidationError};
pub use identity::{RecordId, Timestamp};
pub use resource::{decode_list, Resource, ResourceKind};
pub use stats::DashboardStats;
