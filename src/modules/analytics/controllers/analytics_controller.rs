use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::Result;
use crate::modules::analytics::models::TimeRange;
use crate::modules::analytics::services::AnalyticsService;
use crate::modules::marketing_costs::models::MonthKey;

/// Query parameters for the dashboard report
#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    /// week, month or year
    #[serde(default)]
    pub range: TimeRange,
    /// Visitor count for the conversion rate, supplied by the caller
    #[serde(default)]
    pub visitors: u64,
}

/// GET /admin/analytics
pub async fn get_analytics(
    service: web::Data<AnalyticsService>,
    query: web::Query<AnalyticsQuery>,
) -> Result<HttpResponse> {
    let report = service.report(query.range, query.visitors).await?;
    Ok(HttpResponse::Ok().json(report))
}

/// GET /admin/analytics/month/{month}
pub async fn get_month_summary(
    service: web::Data<AnalyticsService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let month: MonthKey = path.parse()?;
    let summary = service.month_summary(month).await?;
    Ok(HttpResponse::Ok().json(summary))
}

/// Configure analytics routes (mounted under the admin scope)
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/analytics")
            .route("", web::get().to(get_analytics))
            .route("/month/{month}", web::get().to(get_month_summary)),
    );
}
