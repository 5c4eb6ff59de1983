use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::{info, warn};

use crate::core::{ReportingTimezone, Result};
use crate::modules::analytics::models::{AnalyticsReport, MonthSummary, TimeRange};
use crate::modules::analytics::services::aggregator;
use crate::modules::marketing_costs::models::{CostMap, MonthKey};
use crate::modules::marketing_costs::repositories::MarketingCostStore;
use crate::modules::orders::models::Order;
use crate::modules::orders::repositories::OrderStore;

/// Orders and ad spend loaded together for one report
struct Snapshot {
    orders: Vec<Order>,
    costs: CostMap,
    costs_available: bool,
}

/// Builds dashboard analytics from the order and marketing cost stores
pub struct AnalyticsService {
    orders: Arc<dyn OrderStore>,
    costs: Arc<dyn MarketingCostStore>,
    timezone: ReportingTimezone,
}

impl AnalyticsService {
    pub fn new(
        orders: Arc<dyn OrderStore>,
        costs: Arc<dyn MarketingCostStore>,
        timezone: ReportingTimezone,
    ) -> Self {
        Self {
            orders,
            costs,
            timezone,
        }
    }

    /// Load both stores concurrently.
    ///
    /// An order store failure fails the request. A cost store failure
    /// degrades to "no ad spend recorded" so the dashboard still renders.
    async fn snapshot(&self) -> Result<Snapshot> {
        let (orders, costs) = tokio::join!(self.orders.list_orders(), self.costs.get_all_costs());
        let orders = orders?;

        let (costs, costs_available) = match costs {
            Ok(costs) => (costs, true),
            Err(e) => {
                warn!(error = %e, "Marketing costs unavailable, treating ad spend as zero");
                (CostMap::new(), false)
            }
        };

        Ok(Snapshot {
            orders,
            costs,
            costs_available,
        })
    }

    /// Full dashboard report as of the current reporting-local time
    pub async fn report(&self, range: TimeRange, visitors: u64) -> Result<AnalyticsReport> {
        self.report_at(range, visitors, self.timezone.now()).await
    }

    /// Full dashboard report as of `now` (reporting-local)
    pub async fn report_at(
        &self,
        range: TimeRange,
        visitors: u64,
        now: NaiveDateTime,
    ) -> Result<AnalyticsReport> {
        let snapshot = self.snapshot().await?;
        let report = compose_report(
            &snapshot.orders,
            &snapshot.costs,
            range,
            visitors,
            now,
            snapshot.costs_available,
        );

        info!(
            range = ?range,
            orders = snapshot.orders.len(),
            costs_available = snapshot.costs_available,
            "Analytics report generated"
        );

        Ok(report)
    }

    /// Figures for a single month, for previewing ad spend before saving it
    pub async fn month_summary(&self, month: MonthKey) -> Result<MonthSummary> {
        let snapshot = self.snapshot().await?;
        Ok(aggregator::month_summary(
            &snapshot.orders,
            &snapshot.costs,
            month,
        ))
    }
}

/// Assemble every dashboard series from already-loaded inputs
pub fn compose_report(
    orders: &[Order],
    costs: &CostMap,
    range: TimeRange,
    visitors: u64,
    now: NaiveDateTime,
    costs_available: bool,
) -> AnalyticsReport {
    AnalyticsReport {
        range,
        generated_at: now,
        revenue: aggregator::revenue_series(orders, range, now),
        profit: aggregator::profit_series(orders, range, now),
        platforms: aggregator::platform_distribution(orders),
        top_packages: aggregator::top_packages(orders, aggregator::TOP_PACKAGES_LIMIT),
        monthly_profit: aggregator::monthly_profit_after_ads(orders, costs, MonthKey::of(&now)),
        summary: aggregator::dashboard_summary(orders, visitors),
        costs_available,
    }
}
