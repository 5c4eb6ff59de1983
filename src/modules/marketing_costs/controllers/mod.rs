mod marketing_cost_controller;

pub use marketing_cost_controller::{configure, MarketingCostsResponse};
