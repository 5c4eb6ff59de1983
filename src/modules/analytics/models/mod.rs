pub mod analytics;

pub use analytics::{
    AnalyticsReport, DashboardSummary, MonthSummary, MonthlyProfitAfterAds, PackageRanking,
    PlatformCount, ProfitPoint, RevenuePoint, TimeRange,
};
