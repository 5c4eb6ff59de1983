use std::collections::BTreeMap;

use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::core::{JsonAmount, Result};
use crate::modules::marketing_costs::models::{CostMap, MonthKey};
use crate::modules::marketing_costs::services::{MarketingCostService, UpsertMarketingCostRequest};

/// Response for `GET /admin/marketing-costs`
#[derive(Debug, Serialize)]
pub struct MarketingCostsResponse {
    pub costs: BTreeMap<MonthKey, JsonAmount>,
}

impl From<CostMap> for MarketingCostsResponse {
    fn from(costs: CostMap) -> Self {
        Self {
            costs: costs
                .into_iter()
                .map(|(month, cost)| (month, JsonAmount(cost)))
                .collect(),
        }
    }
}

/// GET /admin/marketing-costs
pub async fn get_marketing_costs(
    service: web::Data<MarketingCostService>,
) -> Result<HttpResponse> {
    let costs = service.get_costs().await?;
    Ok(HttpResponse::Ok().json(MarketingCostsResponse::from(costs)))
}

/// PUT /admin/marketing-costs
pub async fn upsert_marketing_cost(
    service: web::Data<MarketingCostService>,
    request: web::Json<UpsertMarketingCostRequest>,
) -> Result<HttpResponse> {
    service.upsert_cost(&request).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}

/// Configure marketing cost routes (mounted under the admin scope)
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/marketing-costs")
            .route(web::get().to(get_marketing_costs))
            .route(web::put().to(upsert_marketing_cost)),
    );
}
