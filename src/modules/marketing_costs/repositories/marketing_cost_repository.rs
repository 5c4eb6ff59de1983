use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::MySqlPool;

use crate::core::Result;
use crate::modules::marketing_costs::models::{CostMap, MarketingCostRow, MonthKey};

/// Store for monthly advertising spend
#[async_trait]
pub trait MarketingCostStore: Send + Sync {
    /// Every recorded month and its spend
    async fn get_all_costs(&self) -> Result<CostMap>;

    /// Insert or replace the spend for one month
    async fn upsert_cost(&self, month: MonthKey, google_ads_cost: Decimal) -> Result<()>;
}

/// MySQL-backed marketing cost store
#[derive(Clone)]
pub struct MySqlMarketingCostRepository {
    pool: MySqlPool,
}

impl MySqlMarketingCostRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MarketingCostStore for MySqlMarketingCostRepository {
    async fn get_all_costs(&self) -> Result<CostMap> {
        let rows = sqlx::query_as::<_, MarketingCostRow>(
            r#"
            SELECT month, google_ads_cost
            FROM marketing_costs
            ORDER BY month
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut costs = CostMap::new();
        for row in rows {
            match row.into_monthly_cost() {
                Ok(cost) => {
                    costs.insert(cost.month, cost.google_ads_cost);
                }
                Err(e) => tracing::warn!(error = %e, "Skipping malformed marketing cost row"),
            }
        }

        Ok(costs)
    }

    async fn upsert_cost(&self, month: MonthKey, google_ads_cost: Decimal) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO marketing_costs (month, google_ads_cost)
            VALUES (?, ?)
            ON DUPLICATE KEY UPDATE google_ads_cost = VALUES(google_ads_cost)
            "#,
        )
        .bind(month.to_string())
        .bind(google_ads_cost)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
