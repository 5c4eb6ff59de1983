pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use controllers::configure;
pub use models::{CostMap, MonthKey, MonthlyCost};
pub use repositories::{MarketingCostStore, MySqlMarketingCostRepository};
pub use services::MarketingCostService;
