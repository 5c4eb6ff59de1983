//! Reachdesk admin backend
//!
//! Order administration, monthly marketing spend, checkout promo codes and
//! dashboard analytics for the follower-package storefront.

pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

use std::sync::Arc;

use actix_web::web;

use crate::core::ReportingTimezone;
use crate::middleware::{
    json_error_handler, path_error_handler, query_error_handler, AdminAuth, AdminTokenCodec,
    RateLimiter,
};
use crate::modules::analytics::AnalyticsService;
use crate::modules::marketing_costs::{MarketingCostService, MarketingCostStore};
use crate::modules::orders::{OrderService, OrderStore};
use crate::modules::promo_codes::{PromoCodeService, PromoCodeStore};

// Re-export commonly used types
pub use crate::core::{AppError, Result};
pub use modules::{analytics, marketing_costs, orders, promo_codes};

/// Application services shared by every worker
#[derive(Clone)]
pub struct Services {
    pub orders: web::Data<OrderService>,
    pub marketing_costs: web::Data<MarketingCostService>,
    pub promo_codes: web::Data<PromoCodeService>,
    pub analytics: web::Data<AnalyticsService>,
}

impl Services {
    pub fn new(
        order_store: Arc<dyn OrderStore>,
        cost_store: Arc<dyn MarketingCostStore>,
        promo_store: Arc<dyn PromoCodeStore>,
        timezone: ReportingTimezone,
    ) -> Self {
        Self {
            orders: web::Data::new(OrderService::new(order_store.clone())),
            marketing_costs: web::Data::new(MarketingCostService::new(cost_store.clone())),
            promo_codes: web::Data::new(PromoCodeService::new(promo_store)),
            analytics: web::Data::new(AnalyticsService::new(order_store, cost_store, timezone)),
        }
    }
}

/// Admin scope settings
#[derive(Clone)]
pub struct AdminSettings {
    pub tokens: AdminTokenCodec,
    pub requests_per_minute: u32,
}

/// Register services, extractor error mapping, health probes and the
/// authenticated `/admin` scope.
///
/// The rate limiter wraps authentication, so rejected credentials still
/// consume quota.
pub fn configure_app(cfg: &mut web::ServiceConfig, services: &Services, admin: &AdminSettings) {
    cfg.app_data(services.orders.clone())
        .app_data(services.marketing_costs.clone())
        .app_data(services.promo_codes.clone())
        .app_data(services.analytics.clone())
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .configure(modules::health::configure)
        .service(
            web::scope("/admin")
                .wrap(AdminAuth::new(admin.tokens.clone()))
                .wrap(RateLimiter::new(admin.requests_per_minute))
                .configure(modules::configure_admin),
        );
}
