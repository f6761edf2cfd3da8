use std::sync::Arc;

use chrono::Utc;

use crate::{
    config::UpstreamConfig,
    db::{DbPool, DbResult, StatsRepo},
    models::{
        BusinessComparison, BusinessStats, Report, ReportFailure, SystemStats, TrailingWindow,
        TrendStats, UserStats, average_revenue_per_user,
    },
};

/// Computes the canned platform reports.
///
/// Every operation returns a [`Report`] rather than a `Result`: a failed read
/// stops the report at that point and the metrics gathered so far are
/// returned together with the failure.
#[derive(Clone)]
pub struct StatsCalculator {
    repo: Arc<dyn StatsRepo>,
    upstream: Option<UpstreamConfig>,
}

impl StatsCalculator {
    pub fn new(db: &DbPool) -> Self {
        Self::from_repo(db.stats())
    }

    pub fn from_repo(repo: Arc<dyn StatsRepo>) -> Self {
        Self {
            repo,
            upstream: None,
        }
    }

    /// Attach the platform backend location. No report reads from it yet.
    pub fn with_upstream(mut self, upstream: Option<UpstreamConfig>) -> Self {
        self.upstream = upstream;
        self
    }

    pub fn upstream(&self) -> Option<&UpstreamConfig> {
        self.upstream.as_ref()
    }

    /// Platform-wide totals plus average revenue per user.
    pub async fn system_stats(&self) -> Report<SystemStats> {
        tracing::debug!(report = "system", "Computing report");
        let mut stats = SystemStats::new(Utc::now());
        let outcome = self.fill_system_stats(&mut stats).await;
        finish("system", stats, outcome)
    }

    async fn fill_system_stats(&self, stats: &mut SystemStats) -> DbResult<()> {
        let total_users = self.repo.count_users().await?;
        stats.total_users = Some(total_users);
        stats.total_businesses = Some(self.repo.count_businesses().await?);
        stats.active_businesses = Some(self.repo.count_active_businesses().await?);
        stats.total_payments = Some(self.repo.count_completed_payments().await?);
        let total_revenue = self.repo.sum_completed_revenue().await?;
        stats.total_revenue = Some(total_revenue);
        stats.active_subscriptions = Some(self.repo.count_active_subscriptions().await?);
        stats.average_revenue_per_user = Some(average_revenue_per_user(total_revenue, total_users));
        Ok(())
    }

    /// Name, status and creation time of one business.
    pub async fn business_stats(&self, business_id: i64) -> Report<BusinessStats> {
        tracing::debug!(report = "business", business_id, "Computing report");
        let mut stats = BusinessStats::new(business_id, Utc::now());
        let outcome = self.fill_business_stats(&mut stats).await;
        finish("business", stats, outcome)
    }

    async fn fill_business_stats(&self, stats: &mut BusinessStats) -> DbResult<()> {
        let business = self.repo.get_business(stats.business_id).await?;
        stats.business_name = Some(business.name);
        stats.is_active = Some(business.is_active);
        stats.created_at = Some(business.created_at);
        Ok(())
    }

    /// Profile of one user plus what they own and have paid.
    pub async fn user_stats(&self, user_id: i64) -> Report<UserStats> {
        tracing::debug!(report = "user", user_id, "Computing report");
        let mut stats = UserStats::new(user_id, Utc::now());
        let outcome = self.fill_user_stats(&mut stats).await;
        finish("user", stats, outcome)
    }

    async fn fill_user_stats(&self, stats: &mut UserStats) -> DbResult<()> {
        let user = self.repo.get_user(stats.user_id).await?;
        stats.username = Some(user.username);
        stats.email = Some(user.email);
        stats.role = Some(user.role);
        stats.max_businesses = Some(user.max_businesses);

        stats.business_count = Some(self.repo.count_businesses_by_owner(user.id).await?);
        stats.payment_count = Some(self.repo.count_completed_payments_by_user(user.id).await?);
        stats.total_spent = Some(self.repo.sum_completed_revenue_by_user(user.id).await?);
        Ok(())
    }

    /// Growth and revenue over the last 30 days, measured on the store's clock.
    pub async fn trend_stats(&self) -> Report<TrendStats> {
        tracing::debug!(report = "trends", "Computing report");
        let window = TrailingWindow::LAST_30_DAYS;
        let mut stats = TrendStats::new(window.label, Utc::now());
        let outcome = self.fill_trend_stats(&mut stats, window).await;
        finish("trends", stats, outcome)
    }

    async fn fill_trend_stats(
        &self,
        stats: &mut TrendStats,
        window: TrailingWindow,
    ) -> DbResult<()> {
        stats.new_users = Some(self.repo.count_users_joined_within(window).await?);
        stats.new_businesses = Some(self.repo.count_businesses_created_within(window).await?);
        stats.revenue = Some(self.repo.sum_completed_revenue_within(window).await?);
        Ok(())
    }

    /// Per-business reports for each id, in the order given.
    ///
    /// A missing business only marks its own entry as failed.
    pub async fn compare_businesses(&self, business_ids: &[i64]) -> BusinessComparison {
        let mut businesses = Vec::with_capacity(business_ids.len());
        for &business_id in business_ids {
            businesses.push(self.business_stats(business_id).await);
        }

        let failed = businesses.iter().filter(|r| !r.is_complete()).count();
        tracing::info!(
            requested = business_ids.len(),
            failed,
            "Business comparison computed"
        );

        BusinessComparison {
            businesses,
            compared_at: Utc::now(),
        }
    }
}

fn finish<T>(report: &'static str, stats: T, outcome: DbResult<()>) -> Report<T> {
    match outcome {
        Ok(()) => {
            tracing::info!(report, "Report computed");
            Report::complete(stats)
        }
        Err(e) => {
            tracing::error!(report, error = %e, "Report computation failed");
            Report::partial(stats, ReportFailure::from(&e))
        }
    }
}
