// Test Application
//
// Wires the production route configuration onto caller-supplied stores and
// issues bearer tokens signed with the test secret.

use actix_web::web;
use reachdesk::core::ReportingTimezone;
use reachdesk::marketing_costs::MarketingCostStore;
use reachdesk::middleware::{AdminClaims, AdminTokenCodec, ADMIN_ROLE};
use reachdesk::orders::OrderStore;
use reachdesk::promo_codes::PromoCodeStore;
use reachdesk::{configure_app, AdminSettings, Services};
use std::sync::Arc;

pub const TEST_SECRET: &str = "test-secret-test-secret-test-secret";

pub fn token_codec() -> AdminTokenCodec {
    AdminTokenCodec::new(TEST_SECRET)
}

/// Valid admin token expiring in one hour
pub fn admin_token() -> String {
    let exp = chrono::Utc::now().timestamp_millis() + 3_600_000;
    token_codec()
        .issue(&AdminClaims::new("ops", ADMIN_ROLE, exp))
        .unwrap()
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

pub fn admin_settings() -> AdminSettings {
    AdminSettings {
        tokens: token_codec(),
        requests_per_minute: 1_000,
    }
}

pub fn test_services(orders: Arc<dyn OrderStore>, costs: Arc<dyn MarketingCostStore>) -> Services {
    test_services_with_promos(orders, costs, Arc::new(super::InMemoryPromoCodeStore::default()))
}

pub fn test_services_with_promos(
    orders: Arc<dyn OrderStore>,
    costs: Arc<dyn MarketingCostStore>,
    promos: Arc<dyn PromoCodeStore>,
) -> Services {
    Services::new(orders, costs, promos, ReportingTimezone::utc())
}

/// Route configuration for `App::configure`
///
/// ```no_run
/// let app = test::init_service(App::new().configure(app_config(services))).await;
/// ```
pub fn app_config(services: Services) -> impl FnOnce(&mut web::ServiceConfig) {
    let admin = admin_settings();
    move |cfg| configure_app(cfg, &services, &admin)
}
