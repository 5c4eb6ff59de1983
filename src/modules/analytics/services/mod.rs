pub mod aggregator;
pub mod analytics_service;

pub use analytics_service::{compose_report, AnalyticsService};
