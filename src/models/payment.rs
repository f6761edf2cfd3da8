use std::fmt;

use serde::{Deserialize, Serialize};

/// Payment lifecycle states as written by the payments backend.
///
/// Only [`PaymentStatus::Completed`] counts towards revenue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

impl PaymentStatus {
    /// Convert to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
            Self::Refunded => "REFUNDED",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Trailing time window ending at the store's current time.
///
/// The start of the window is always computed by the database
/// (`now - days`), so every metric of one report shares the store clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailingWindow {
    pub days: i32,
    pub label: &'static str,
}

impl TrailingWindow {
    pub const LAST_30_DAYS: TrailingWindow = TrailingWindow {
        days: 30,
        label: "last_30_days",
    };

    /// SQLite `datetime()` modifier for the window start, e.g. `-30 days`.
    pub fn sqlite_modifier(&self) -> String {
        format!("-{} days", self.days)
    }
}
