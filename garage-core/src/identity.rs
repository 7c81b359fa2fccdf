//! Identity types for garage records

use chrono::{DateTime, Utc};

/// Server-assigned record identifier.
///
/// The client never mints these; it only echoes back what a list or create
/// response carried.
pub type RecordId = String;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;
