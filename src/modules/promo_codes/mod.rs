pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use controllers::configure;
pub use models::{DiscountType, NewPromoCode, PromoCode, PromoCodeUpdate};
pub use repositories::{MySqlPromoCodeRepository, PromoCodeStore};
pub use services::PromoCodeService;
