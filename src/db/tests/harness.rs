//! Test harness for database repository testing
//!
//! Provides utilities for setting up test databases:
//! - SQLite: Fast in-memory databases with real migrations
//! - PostgreSQL: Testcontainers-based instances with real migrations
//!
//! Rows are inserted through [`Seeder`], which places timestamps relative to
//! the database clock so trailing-window tests do not depend on the host time.

use async_trait::async_trait;
#[cfg(feature = "database-sqlite")]
use sqlx::SqlitePool;

use crate::models::PaymentStatus;

/// Create an in-memory SQLite pool for testing
#[cfg(feature = "database-sqlite")]
pub async fn create_sqlite_pool() -> SqlitePool {
    sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory SQLite pool")
}

/// Run SQLite migrations on the pool
///
/// Uses the actual migration files to ensure tests match the reporting schema
#[cfg(feature = "database-sqlite")]
pub async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations_sqlx/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}

/// Inserts platform rows for report tests.
///
/// `*_days_ago` arguments are offsets from the database's own `now`.
#[async_trait]
pub trait Seeder: Send + Sync {
    async fn user(&self, username: &str, joined_days_ago: i32) -> i64;
    async fn business(&self, owner_id: i64, name: &str, is_active: bool, created_days_ago: i32)
    -> i64;
    async fn payment(&self, user_id: i64, amount: f64, status: PaymentStatus, days_ago: i32);
    async fn subscription(&self, user_id: i64, is_active: bool);
    /// Run arbitrary DDL, e.g. to break a table for failure tests.
    async fn execute(&self, sql: &str);
}

#[cfg(feature = "database-sqlite")]
fn sqlite_offset(days_ago: i32) -> String {
    format!("-{days_ago} days")
}

#[cfg(feature = "database-sqlite")]
#[async_trait]
impl Seeder for SqlitePool {
    async fn user(&self, username: &str, joined_days_ago: i32) -> i64 {
        sqlx::query_scalar(
            r#"
            INSERT INTO users (username, email, role, max_businesses, date_joined)
            VALUES (?, ?, 'user', 3, datetime('now', ?))
            RETURNING id
            "#,
        )
        .bind(username)
        .bind(format!("{username}@example.com"))
        .bind(sqlite_offset(joined_days_ago))
        .fetch_one(self)
        .await
        .expect("Failed to insert user")
    }

    async fn business(
        &self,
        owner_id: i64,
        name: &str,
        is_active: bool,
        created_days_ago: i32,
    ) -> i64 {
        sqlx::query_scalar(
            r#"
            INSERT INTO users_business (name, is_active, owner_id, created_at)
            VALUES (?, ?, ?, datetime('now', ?))
            RETURNING id
            "#,
        )
        .bind(name)
        .bind(is_active)
        .bind(owner_id)
        .bind(sqlite_offset(created_days_ago))
        .fetch_one(self)
        .await
        .expect("Failed to insert business")
    }

    async fn payment(&self, user_id: i64, amount: f64, status: PaymentStatus, days_ago: i32) {
        sqlx::query(
            r#"
            INSERT INTO payments_payment (user_id, amount, status, created_at)
            VALUES (?, ?, ?, datetime('now', ?))
            "#,
        )
        .bind(user_id)
        .bind(amount)
        .bind(status.as_str())
        .bind(sqlite_offset(days_ago))
        .execute(self)
        .await
        .expect("Failed to insert payment");
    }

    async fn subscription(&self, user_id: i64, is_active: bool) {
        sqlx::query("INSERT INTO payments_subscription (user_id, is_active) VALUES (?, ?)")
            .bind(user_id)
            .bind(is_active)
            .execute(self)
            .await
            .expect("Failed to insert subscription");
    }

    async fn execute(&self, sql: &str) {
        sqlx::query(sql)
            .execute(self)
            .await
            .expect("Failed to execute statement");
    }
}

/// PostgreSQL test harness using testcontainers
#[cfg(all(test, feature = "database-postgres"))]
pub mod postgres {
    use std::sync::OnceLock;

    use async_trait::async_trait;
    use sqlx::PgPool;
    use testcontainers_modules::{
        postgres::Postgres,
        testcontainers::{ContainerAsync, ImageExt, runners::AsyncRunner},
    };
    use tokio::sync::OnceCell;

    use super::Seeder;
    use crate::models::PaymentStatus;

    /// Shared container state - initialized once per test run
    struct SharedContainer {
        #[allow(dead_code)] // Test infrastructure: keeps container alive
        container: ContainerAsync<Postgres>,
        connection_string: String,
    }

    /// Global shared container - lazily initialized on first use
    static SHARED_CONTAINER: OnceLock<OnceCell<SharedContainer>> = OnceLock::new();

    async fn get_shared_container() -> &'static SharedContainer {
        let cell = SHARED_CONTAINER.get_or_init(OnceCell::new);
        cell.get_or_init(|| async {
            let container = Postgres::default()
                .with_tag("17-alpine")
                .start()
                .await
                .expect("Failed to start PostgreSQL container");

            let host = container.get_host().await.expect("Failed to get host");
            let port = container
                .get_host_port_ipv4(5432)
                .await
                .expect("Failed to get port");

            SharedContainer {
                container,
                connection_string: format!("postgres://postgres:postgres@{host}:{port}/postgres"),
            }
        })
        .await
    }

    /// Create a pool bound to a fresh schema in the shared container.
    ///
    /// Each test gets its own schema, so the platform tables can use their
    /// real names without tests seeing each other's rows.
    pub async fn create_isolated_postgres_pool() -> PgPool {
        let shared = get_shared_container().await;

        let admin_pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(1)
            .connect(&shared.connection_string)
            .await
            .expect("Failed to connect to PostgreSQL");

        let schema_name = format!("test_{}", uuid::Uuid::new_v4().simple());

        sqlx::query(&format!("CREATE SCHEMA \"{schema_name}\""))
            .execute(&admin_pool)
            .await
            .expect("Failed to create test schema");

        let isolated_url = format!(
            "{}?options=-c search_path={}",
            shared.connection_string, schema_name
        );

        sqlx::postgres::PgPoolOptions::new()
            .max_connections(5)
            .connect(&isolated_url)
            .await
            .expect("Failed to connect to isolated schema")
    }

    /// Run PostgreSQL migrations on the pool
    pub async fn run_postgres_migrations(pool: &PgPool) {
        sqlx::migrate!("./migrations_sqlx/postgres")
            .run(pool)
            .await
            .expect("Failed to run PostgreSQL migrations");
    }

    #[async_trait]
    impl Seeder for PgPool {
        async fn user(&self, username: &str, joined_days_ago: i32) -> i64 {
            sqlx::query_scalar(
                r#"
                INSERT INTO users (username, email, role, max_businesses, date_joined)
                VALUES ($1, $2, 'user', 3, NOW() - make_interval(days => $3))
                RETURNING id
                "#,
            )
            .bind(username)
            .bind(format!("{username}@example.com"))
            .bind(joined_days_ago)
            .fetch_one(self)
            .await
            .expect("Failed to insert user")
        }

        async fn business(
            &self,
            owner_id: i64,
            name: &str,
            is_active: bool,
            created_days_ago: i32,
        ) -> i64 {
            sqlx::query_scalar(
                r#"
                INSERT INTO users_business (name, is_active, owner_id, created_at)
                VALUES ($1, $2, $3, NOW() - make_interval(days => $4))
                RETURNING id
                "#,
            )
            .bind(name)
            .bind(is_active)
            .bind(owner_id)
            .bind(created_days_ago)
            .fetch_one(self)
            .await
            .expect("Failed to insert business")
        }

        async fn payment(&self, user_id: i64, amount: f64, status: PaymentStatus, days_ago: i32) {
            sqlx::query(
                r#"
                INSERT INTO payments_payment (user_id, amount, status, created_at)
                VALUES ($1, $2, $3, NOW() - make_interval(days => $4))
                "#,
            )
            .bind(user_id)
            .bind(amount)
            .bind(status.as_str())
            .bind(days_ago)
            .execute(self)
            .await
            .expect("Failed to insert payment");
        }

        async fn subscription(&self, user_id: i64, is_active: bool) {
            sqlx::query("INSERT INTO payments_subscription (user_id, is_active) VALUES ($1, $2)")
                .bind(user_id)
                .bind(is_active)
                .execute(self)
                .await
                .expect("Failed to insert subscription");
        }

        async fn execute(&self, sql: &str) {
            sqlx::query(sql)
                .execute(self)
                .await
                .expect("Failed to execute statement");
        }
    }
}
