use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::{
    db::{
        error::{DbResult, exactly_one},
        repos::StatsRepo,
    },
    models::{BusinessInfo, PaymentStatus, TrailingWindow, UserProfile},
};

/// Reports never write, so the repo only holds the read pool
/// (the replica when one is configured, the primary otherwise).
pub struct PostgresStatsRepo {
    read_pool: PgPool,
}

impl PostgresStatsRepo {
    pub fn new(read_pool: PgPool) -> Self {
        Self { read_pool }
    }

    async fn count(&self, sql: &str) -> DbResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(sql)
            .fetch_one(&self.read_pool)
            .await?;
        Ok(count)
    }
}

// Sums are cast to float8 so NUMERIC amount columns decode the same as
// DOUBLE PRECISION ones. Window starts use the server's NOW().

#[async_trait]
impl StatsRepo for PostgresStatsRepo {
    async fn count_users(&self) -> DbResult<i64> {
        self.count("SELECT COUNT(*) FROM users").await
    }

    async fn count_businesses(&self) -> DbResult<i64> {
        self.count("SELECT COUNT(*) FROM users_business").await
    }

    async fn count_active_businesses(&self) -> DbResult<i64> {
        self.count("SELECT COUNT(*) FROM users_business WHERE is_active = TRUE")
            .await
    }

    async fn count_completed_payments(&self) -> DbResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM payments_payment WHERE status = $1",
        )
        .bind(PaymentStatus::Completed.as_str())
        .fetch_one(&self.read_pool)
        .await?;
        Ok(count)
    }

    async fn sum_completed_revenue(&self) -> DbResult<f64> {
        let total = sqlx::query_scalar::<_, f64>(
            "SELECT COALESCE(SUM(amount), 0)::float8 FROM payments_payment WHERE status = $1",
        )
        .bind(PaymentStatus::Completed.as_str())
        .fetch_one(&self.read_pool)
        .await?;
        Ok(total)
    }

    async fn count_active_subscriptions(&self) -> DbResult<i64> {
        self.count("SELECT COUNT(*) FROM payments_subscription WHERE is_active = TRUE")
            .await
    }

    async fn get_business(&self, business_id: i64) -> DbResult<BusinessInfo> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, is_active, created_at
            FROM users_business
            WHERE id = $1
            LIMIT 2
            "#,
        )
        .bind(business_id)
        .fetch_all(&self.read_pool)
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
            WHERE id = $1
            LIMIT 2
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.read_pool)
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
            "SELECT COUNT(*) FROM users_business WHERE owner_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.read_pool)
        .await?;
        Ok(count)
    }

    async fn count_completed_payments_by_user(&self, user_id: i64) -> DbResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM payments_payment WHERE user_id = $1 AND status = $2",
        )
        .bind(user_id)
        .bind(PaymentStatus::Completed.as_str())
        .fetch_one(&self.read_pool)
        .await?;
        Ok(count)
    }

    async fn sum_completed_revenue_by_user(&self, user_id: i64) -> DbResult<f64> {
        let total = sqlx::query_scalar::<_, f64>(
            r#"
            SELECT COALESCE(SUM(amount), 0)::float8
            FROM payments_payment
            WHERE user_id = $1 AND status = $2
            "#,
        )
        .bind(user_id)
        .bind(PaymentStatus::Completed.as_str())
        .fetch_one(&self.read_pool)
        .await?;
        Ok(total)
    }

    async fn count_users_joined_within(&self, window: TrailingWindow) -> DbResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE date_joined >= NOW() - make_interval(days => $1)",
        )
        .bind(window.days)
        .fetch_one(&self.read_pool)
        .await?;
        Ok(count)
    }

    async fn count_businesses_created_within(&self, window: TrailingWindow) -> DbResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users_business WHERE created_at >= NOW() - make_interval(days => $1)",
        )
        .bind(window.days)
        .fetch_one(&self.read_pool)
        .await?;
        Ok(count)
    }

    async fn sum_completed_revenue_within(&self, window: TrailingWindow) -> DbResult<f64> {
        let total = sqlx::query_scalar::<_, f64>(
            r#"
            SELECT COALESCE(SUM(amount), 0)::float8
            FROM payments_payment
            WHERE status = $1
                AND created_at >= NOW() - make_interval(days => $2)
            "#,
        )
        .bind(PaymentStatus::Completed.as_str())
        .bind(window.days)
        .fetch_one(&self.read_pool)
        .await?;
        Ok(total)
    }
}
