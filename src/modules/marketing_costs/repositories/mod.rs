pub mod marketing_cost_repository;

pub use marketing_cost_repository::{MarketingCostStore, MySqlMarketingCostRepository};
