pub mod analytics;
pub mod health;
pub mod marketing_costs;
pub mod orders;
pub mod promo_codes;

use actix_web::web;

/// Routes mounted under `/admin`; authentication is applied by the caller
pub fn configure_admin(cfg: &mut web::ServiceConfig) {
    cfg.configure(orders::configure)
        .configure(marketing_costs::configure)
        .configure(promo_codes::configure)
        .configure(analytics::configure);
}
