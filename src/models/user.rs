use serde::{Deserialize, Serialize};

/// Account fields read for per-user reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// Platform role as stored by the backend (`superadmin`, `admin`, `user`)
    pub role: String,
    /// Maximum number of businesses the user may own
    pub max_businesses: i32,
}
