use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use crate::{
    db::{
        error::{DbResult, exactly_one},
        repos::StatsRepo,
    },
    models::{BusinessInfo, PaymentStatus, TrailingWindow, UserProfile},
};

pub struct SqliteStatsRepo {
    pool: SqlitePool,
}

impl SqliteStatsRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn count(&self, sql: &str) -> DbResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(sql)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// Timestamps are wrapped in datetime() on both sides so RFC 3339 values
// ("2025-01-01T00:00:00+00:00") compare correctly against SQLite's
// "YYYY-MM-DD HH:MM:SS" clock output. TOTAL() always returns a REAL,
// 0.0 when nothing matches.

#[async_trait]
impl StatsRepo for SqliteStatsRepo {
    async fn count_users(&self) -> DbResult<i64> {
        self.count("SELECT COUNT(*) FROM users").await
    }

    async fn count_businesses(&self) -> DbResult<i64> {
        self.count("SELECT COUNT(*) FROM users_business").await
    }

    async fn count_active_businesses(&self) -> DbResult<i64> {
        self.count("SELECT COUNT(*) FROM users_business WHERE is_active = 1")
            .await
    }

    async fn count_completed_payments(&self) -> DbResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM payments_payment WHERE status = ?",
        )
        .bind(PaymentStatus::Completed.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn sum_completed_revenue(&self) -> DbResult<f64> {
        let total = sqlx::query_scalar::<_, f64>(
            "SELECT TOTAL(amount) FROM payments_payment WHERE status = ?",
        )
        .bind(PaymentStatus::Completed.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    async fn count_active_subscriptions(&self) -> DbResult<i64> {
        self.count("SELECT COUNT(*) FROM payments_subscription WHERE is_active = 1")
            .await
    }

    async fn get_business(&self, business_id: i64) -> DbResult<BusinessInfo> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, is_active, created_at
            FROM users_business
            WHERE id = ?
            LIMIT 2
            "#,
        )
        .bind(business_id)
        .fetch_all(&self.pool)
        .await?;

        let row = exactly_one(rows, || format!("business {business_id}"))?;
        Ok(BusinessInfo {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get("created_at")?,
        })
    }

    async fn get_user(&self, user_id: i64) -> DbResult<UserProfile> {
        let rows = sqlx::query(
            r#"
            SELECT id, username, email, role, max_businesses
            FROM users
            WHERE id = ?
            LIMIT 2
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let row = exactly_one(rows, || format!("user {user_id}"))?;
        Ok(UserProfile {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            email: row.try_get("email")?,
            role: row.try_get("role")?,
            max_businesses: row.try_get("max_businesses")?,
        })
    }

    async fn count_businesses_by_owner(&self, user_id: i64) -> DbResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users_business WHERE owner_id = ?",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn count_completed_payments_by_user(&self, user_id: i64) -> DbResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM payments_payment WHERE user_id = ? AND status = ?",
        )
        .bind(user_id)
        .bind(PaymentStatus::Completed.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn sum_completed_revenue_by_user(&self, user_id: i64) -> DbResult<f64> {
        let total = sqlx::query_scalar::<_, f64>(
            "SELECT TOTAL(amount) FROM payments_payment WHERE user_id = ? AND status = ?",
        )
        .bind(user_id)
        .bind(PaymentStatus::Completed.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    async fn count_users_joined_within(&self, window: TrailingWindow) -> DbResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE datetime(date_joined) >= datetime('now', ?)",
        )
        .bind(window.sqlite_modifier())
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn count_businesses_created_within(&self, window: TrailingWindow) -> DbResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users_business WHERE datetime(created_at) >= datetime('now', ?)",
        )
        .bind(window.sqlite_modifier())
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn sum_completed_revenue_within(&self, window: TrailingWindow) -> DbResult<f64> {
        let total = sqlx::query_scalar::<_, f64>(
            r#"
            SELECT TOTAL(amount)
            FROM payments_payment
            WHERE status = ?
                AND datetime(created_at) >= datetime('now', ?)
            "#,
        )
        .bind(PaymentStatus::Completed.as_str())
        .bind(window.sqlite_modifier())
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }
}
