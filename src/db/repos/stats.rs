use async_trait::async_trait;

use crate::{
    db::error::DbResult,
    models::{BusinessInfo, TrailingWindow, UserProfile},
};

/// Read-only aggregate queries backing the canned reports.
///
/// Every method is a single store round-trip. Sums are coalesced to zero by
/// the store, so an empty match yields `0.0` rather than an error.
#[async_trait]
pub trait StatsRepo: Send + Sync {
    // ==================== Platform Totals ====================

    async fn count_users(&self) -> DbResult<i64>;
    async fn count_businesses(&self) -> DbResult<i64>;
    async fn count_active_businesses(&self) -> DbResult<i64>;
    async fn count_completed_payments(&self) -> DbResult<i64>;
    async fn sum_completed_revenue(&self) -> DbResult<f64>;
    async fn count_active_subscriptions(&self) -> DbResult<i64>;

    // ==================== Single-Entity Lookups ====================

    /// Look up one business by id.
    /// Returns `NotFound` for no match and `MultipleRows` for more than one.
    async fn get_business(&self, business_id: i64) -> DbResult<BusinessInfo>;

    /// Look up one user by id.
    /// Returns `NotFound` for no match and `MultipleRows` for more than one.
    async fn get_user(&self, user_id: i64) -> DbResult<UserProfile>;

    // ==================== Per-User Aggregates ====================

    async fn count_businesses_by_owner(&self, user_id: i64) -> DbResult<i64>;
    async fn count_completed_payments_by_user(&self, user_id: i64) -> DbResult<i64>;
    async fn sum_completed_revenue_by_user(&self, user_id: i64) -> DbResult<f64>;

    // ==================== Trailing Window Aggregates ====================
    // The window start is computed from the store's clock, inclusive.

    async fn count_users_joined_within(&self, window: TrailingWindow) -> DbResult<i64>;
    async fn count_businesses_created_within(&self, window: TrailingWindow) -> DbResult<i64>;
    async fn sum_completed_revenue_within(&self, window: TrailingWindow) -> DbResult<f64>;
}
