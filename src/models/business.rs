use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Business fields read for per-business reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessInfo {
    pub id: i64,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
