//! Report payloads produced by the statistics calculator.
//!
//! Every report is a typed metric struct wrapped in [`Report`]. Metrics that
//! depend on a store read are `Option`s and are left out of the serialized
//! output until the read succeeds, so a failed report carries exactly the
//! metrics computed before the failure plus an `error` field.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::db::DbError;

/// Coarse classification of why a report is incomplete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// A required entity was missing or matched more than one row
    LookupFailed,
    /// The store could not be reached (pool exhausted, connection lost, TLS)
    StoreUnavailable,
    /// The store rejected the query or returned something undecodable
    QueryFailed,
}

impl FailureKind {
    pub fn classify(err: &DbError) -> Self {
        match err {
            DbError::NotFound(_) | DbError::MultipleRows(_) => Self::LookupFailed,
            DbError::NotConfigured => Self::StoreUnavailable,
            #[cfg(any(feature = "database-sqlite", feature = "database-postgres"))]
            DbError::Sqlx(e) => match e {
                sqlx::Error::RowNotFound => Self::LookupFailed,
                sqlx::Error::PoolTimedOut
                | sqlx::Error::PoolClosed
                | sqlx::Error::Io(_)
                | sqlx::Error::Tls(_)
                | sqlx::Error::Protocol(_)
                | sqlx::Error::WorkerCrashed => Self::StoreUnavailable,
                _ => Self::QueryFailed,
            },
            #[cfg(any(feature = "database-sqlite", feature = "database-postgres"))]
            DbError::Migration(_) => Self::QueryFailed,
            DbError::Internal(_) => Self::QueryFailed,
        }
    }
}

/// Failure descriptor attached to an incomplete report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportFailure {
    /// Human-readable description of the failure
    #[serde(rename = "error")]
    pub message: String,
    #[serde(rename = "errorKind")]
    pub kind: FailureKind,
}

impl From<&DbError> for ReportFailure {
    fn from(err: &DbError) -> Self {
        Self {
            message: err.to_string(),
            kind: FailureKind::classify(err),
        }
    }
}

/// A best-effort report: whatever metrics were computed, plus an optional
/// failure. Serializes flat, e.g. `{"businessId": 42, "error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report<T> {
    #[serde(flatten)]
    pub stats: T,
    #[serde(flatten)]
    pub failure: Option<ReportFailure>,
}

impl<T> Report<T> {
    pub fn complete(stats: T) -> Self {
        Self {
            stats,
            failure: None,
        }
    }

    pub fn partial(stats: T, failure: ReportFailure) -> Self {
        Self {
            stats,
            failure: Some(failure),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }

    /// The failure message, if the report is incomplete.
    pub fn error(&self) -> Option<&str> {
        self.failure.as_ref().map(|f| f.message.as_str())
    }
}

/// Platform-wide totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_users: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_businesses: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_businesses: Option<i64>,
    /// Number of completed payments
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_payments: Option<i64>,
    /// Sum of completed payment amounts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_revenue: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_subscriptions: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_revenue_per_user: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl SystemStats {
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            total_users: None,
            total_businesses: None,
            active_businesses: None,
            total_payments: None,
            total_revenue: None,
            active_subscriptions: None,
            average_revenue_per_user: None,
            timestamp,
        }
    }
}

/// Revenue divided by users; zero when there are no users.
pub fn average_revenue_per_user(total_revenue: f64, total_users: i64) -> f64 {
    if total_users > 0 {
        total_revenue / total_users as f64
    } else {
        0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessStats {
    pub business_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    pub calculated_at: DateTime<Utc>,
}

impl BusinessStats {
    pub fn new(business_id: i64, calculated_at: DateTime<Utc>) -> Self {
        Self {
            business_id,
            business_name: None,
            is_active: None,
            created_at: None,
            calculated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub user_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_businesses: Option<i32>,
    /// Businesses owned by the user
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_count: Option<i64>,
    /// Completed payments made by the user
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_count: Option<i64>,
    /// Sum of the user's completed payment amounts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_spent: Option<f64>,
    pub calculated_at: DateTime<Utc>,
}

impl UserStats {
    pub fn new(user_id: i64, calculated_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            username: None,
            email: None,
            role: None,
            max_businesses: None,
            business_count: None,
            payment_count: None,
            total_spent: None,
            calculated_at,
        }
    }
}

/// Growth over the trailing window.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendStats {
    #[serde(rename = "newUsers30d", skip_serializing_if = "Option::is_none")]
    pub new_users: Option<i64>,
    #[serde(rename = "newBusinesses30d", skip_serializing_if = "Option::is_none")]
    pub new_businesses: Option<i64>,
    #[serde(rename = "revenue30d", skip_serializing_if = "Option::is_none")]
    pub revenue: Option<f64>,
    pub period: &'static str,
    pub calculated_at: DateTime<Utc>,
}

impl TrendStats {
    pub fn new(period: &'static str, calculated_at: DateTime<Utc>) -> Self {
        Self {
            new_users: None,
            new_businesses: None,
            revenue: None,
            period,
            calculated_at,
        }
    }
}

/// Per-business reports in request order. Individual entries may be partial.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessComparison {
    pub businesses: Vec<Report<BusinessStats>>,
    pub compared_at: DateTime<Utc>,
}
