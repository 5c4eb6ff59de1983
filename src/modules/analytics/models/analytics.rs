use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::modules::marketing_costs::models::MonthKey;
use crate::modules::orders::models::Platform;

/// Window selector for the dashboard revenue charts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    /// Last 7 days, one bucket per weekday
    #[default]
    Week,
    /// Last 30 days, one bucket per day
    Month,
    /// Last 365 days, bucketed by month name only
    Year,
}

impl TimeRange {
    pub fn days_back(self) -> i64 {
        match self {
            TimeRange::Week => 7,
            TimeRange::Month => 30,
            TimeRange::Year => 365,
        }
    }

    /// Bucket label for a day: "Mon", "05 Jan" or "Jan"
    pub fn label(self, date: NaiveDate) -> String {
        let pattern = match self {
            TimeRange::Week => "%a",
            TimeRange::Month => "%d %b",
            TimeRange::Year => "%b",
        };
        date.format(pattern).to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenuePoint {
    pub name: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfitPoint {
    pub name: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub profit: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformCount {
    pub platform: Platform,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageRanking {
    pub followers: u32,
    pub platform: Platform,
    pub count: u64,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub revenue: Decimal,
}

/// One point of the trailing 12-month series
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyProfitAfterAds {
    pub month: MonthKey,
    /// Month abbreviation only; `month` disambiguates across years
    pub name: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub revenue: Decimal,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub cost: Decimal,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub google_ads: Decimal,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub profit: Decimal,
}

/// Figures for a single month, used to preview before saving ad spend
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthSummary {
    pub month: MonthKey,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub revenue: Decimal,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub cost: Decimal,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub google_ads: Decimal,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub profit: Decimal,
}

/// Headline figures of the dashboard cards
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_orders: u64,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub total_revenue: Decimal,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub total_cost: Decimal,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub total_profit: Decimal,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub average_cart: Decimal,
    pub visitors: u64,
    /// Orders per visitor in percent, one decimal
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub conversion_rate: Decimal,
}

/// Everything the analytics tab renders, computed in one pass over the inputs
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub range: TimeRange,
    pub generated_at: NaiveDateTime,
    pub revenue: Vec<RevenuePoint>,
    pub profit: Vec<ProfitPoint>,
    pub platforms: Vec<PlatformCount>,
    pub top_packages: Vec<PackageRanking>,
    pub monthly_profit: Vec<MonthlyProfitAfterAds>,
    pub summary: DashboardSummary,
    /// False when the marketing cost store could not be read and ad spend
    /// was assumed to be zero
    pub costs_available: bool,
}
