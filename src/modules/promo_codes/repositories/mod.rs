pub mod promo_code_repository;

pub use promo_code_repository::{MySqlPromoCodeRepository, PromoCodeStore};
