use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use crate::core::money::{amount_from_json, is_storable_amount};
use crate::core::{AppError, Result};
use crate::modules::marketing_costs::models::{CostMap, MonthKey, MonthlyCost};
use crate::modules::marketing_costs::repositories::MarketingCostStore;

/// Body of `PUT /admin/marketing-costs`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertMarketingCostRequest {
    #[serde(default)]
    pub month: Option<String>,
    #[serde(default)]
    pub google_ads_cost: Option<serde_json::Value>,
}

impl UpsertMarketingCostRequest {
    /// Validate into a typed monthly cost without touching the store
    pub fn validate(&self) -> Result<MonthlyCost> {
        let month: MonthKey = self
            .month
            .as_deref()
            .ok_or_else(|| AppError::validation("Invalid month. Expected YYYY-MM"))?
            .parse()?;

        let google_ads_cost = self
            .google_ads_cost
            .as_ref()
            .and_then(amount_from_json)
            .filter(|cost| is_storable_amount(*cost))
            .ok_or_else(|| {
                AppError::validation(
                    "Invalid googleAdsCost. Must be a number >= 0 with at most 2 decimals, up to 9999999999.99",
                )
            })?;

        Ok(MonthlyCost {
            month,
            google_ads_cost,
        })
    }
}

/// Reads and writes monthly advertising spend
pub struct MarketingCostService {
    store: Arc<dyn MarketingCostStore>,
}

impl MarketingCostService {
    pub fn new(store: Arc<dyn MarketingCostStore>) -> Self {
        Self { store }
    }

    pub async fn get_costs(&self) -> Result<CostMap> {
        self.store.get_all_costs().await
    }

    /// Validate then persist; latest write for a month wins
    pub async fn upsert_cost(&self, request: &UpsertMarketingCostRequest) -> Result<MonthlyCost> {
        let cost = request.validate()?;

        self.store
            .upsert_cost(cost.month, cost.google_ads_cost)
            .await?;

        info!(
            month = %cost.month,
            google_ads_cost = %cost.google_ads_cost,
            "Marketing cost saved"
        );

        Ok(cost)
    }
}
