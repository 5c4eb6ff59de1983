pub mod marketing_cost;

pub use marketing_cost::{CostMap, MarketingCostRow, MonthKey, MonthlyCost};
