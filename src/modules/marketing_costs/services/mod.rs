pub mod marketing_cost_service;

pub use marketing_cost_service::{MarketingCostService, UpsertMarketingCostRequest};
