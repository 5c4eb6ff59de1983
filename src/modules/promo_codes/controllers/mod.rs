mod promo_code_controller;

pub use promo_code_controller::configure;
