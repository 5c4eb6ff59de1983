//! Pure aggregation over normalized orders.
//!
//! Every function here takes its inputs by reference and the current
//! reporting-local time as a parameter, so results are reproducible in tests.
//! Sums are kept exact and rounded to cents only when a point is emitted.
//! Accumulation saturates instead of overflowing, so one absurd stored amount
//! cannot take the dashboard down.

use std::collections::HashMap;

use chrono::{Duration, NaiveDateTime};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::core::round_money;
use crate::modules::analytics::models::{
    DashboardSummary, MonthSummary, MonthlyProfitAfterAds, PackageRanking, PlatformCount,
    ProfitPoint, RevenuePoint, TimeRange,
};
use crate::modules::marketing_costs::models::{CostMap, MonthKey};
use crate::modules::orders::models::{Order, Platform};

/// Number of package tiers returned by [`top_packages`]
pub const TOP_PACKAGES_LIMIT: usize = 5;

/// Length of the profit-after-ads series
pub const MONTHLY_SERIES_LEN: usize = 12;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Labelled buckets in first-seen order
struct Buckets {
    points: Vec<(String, Decimal)>,
    index: HashMap<String, usize>,
}

impl Buckets {
    /// One bucket per distinct label over the last `days_back` days, oldest first.
    ///
    /// Labels that repeat inside the window (month names for the yearly range)
    /// collapse into the bucket created by their first occurrence.
    fn seed(range: TimeRange, now: NaiveDateTime) -> Self {
        let today = now.date();
        let mut buckets = Self {
            points: Vec::new(),
            index: HashMap::new(),
        };

        for days_ago in (0..range.days_back()).rev() {
            let label = range.label(today - Duration::days(days_ago));
            if !buckets.index.contains_key(&label) {
                buckets.index.insert(label.clone(), buckets.points.len());
                buckets.points.push((label, Decimal::ZERO));
            }
        }

        buckets
    }

    /// Add to the bucket for `label`, appending one when the label was not seeded
    fn add(&mut self, label: String, value: Decimal) {
        match self.index.get(&label) {
            Some(&slot) => {
                let total = &mut self.points[slot].1;
                *total = total.saturating_add(value);
            }
            None => {
                self.index.insert(label.clone(), self.points.len());
                self.points.push((label, value));
            }
        }
    }
}

/// Whether an order falls inside the rolling window.
///
/// Distance is measured in whole days rounded up, so an order placed exactly
/// `days_back` days ago is still counted.
pub fn within_window(created_at: NaiveDateTime, now: NaiveDateTime, days_back: i64) -> bool {
    let elapsed = (now - created_at).num_milliseconds();
    let days = -(-elapsed).div_euclid(MILLIS_PER_DAY);
    days <= days_back
}

fn bucketed<F>(orders: &[Order], range: TimeRange, now: NaiveDateTime, value: F) -> Vec<(String, Decimal)>
where
    F: Fn(&Order) -> Decimal,
{
    let mut buckets = Buckets::seed(range, now);
    let days_back = range.days_back();

    for order in orders {
        if within_window(order.created_at, now, days_back) {
            buckets.add(range.label(order.created_at.date()), value(order));
        }
    }

    buckets.points
}

/// Revenue per bucket for the selected range
pub fn revenue_series(orders: &[Order], range: TimeRange, now: NaiveDateTime) -> Vec<RevenuePoint> {
    bucketed(orders, range, now, |order| order.revenue)
        .into_iter()
        .map(|(name, revenue)| RevenuePoint {
            name,
            revenue: round_money(revenue),
        })
        .collect()
}

/// Gross profit (revenue minus fulfillment cost) per bucket
pub fn profit_series(orders: &[Order], range: TimeRange, now: NaiveDateTime) -> Vec<ProfitPoint> {
    bucketed(orders, range, now, Order::gross_profit)
        .into_iter()
        .map(|(name, profit)| ProfitPoint {
            name,
            profit: round_money(profit),
        })
        .collect()
}

/// Order counts for the charted platforms; other platforms are not listed
pub fn platform_distribution(orders: &[Order]) -> Vec<PlatformCount> {
    Platform::REPORTED
        .iter()
        .map(|platform| PlatformCount {
            platform: platform.clone(),
            count: orders.iter().filter(|o| &o.platform == platform).count() as u64,
        })
        .collect()
}

/// Most popular follower tiers by order count.
///
/// A tier is labelled with the platform of the first order seen for it. Ties
/// keep first-seen order.
pub fn top_packages(orders: &[Order], limit: usize) -> Vec<PackageRanking> {
    let mut rankings: Vec<PackageRanking> = Vec::new();
    let mut index: HashMap<u32, usize> = HashMap::new();

    for order in orders {
        match index.get(&order.followers) {
            Some(&slot) => {
                let ranking = &mut rankings[slot];
                ranking.count += 1;
                ranking.revenue = ranking.revenue.saturating_add(order.revenue);
            }
            None => {
                index.insert(order.followers, rankings.len());
                rankings.push(PackageRanking {
                    followers: order.followers,
                    platform: order.platform.clone(),
                    count: 1,
                    revenue: order.revenue,
                });
            }
        }
    }

    rankings.sort_by(|a, b| b.count.cmp(&a.count));
    rankings.truncate(limit);
    for ranking in &mut rankings {
        ranking.revenue = round_money(ranking.revenue);
    }
    rankings
}

fn saturating_sum(values: impl Iterator<Item = Decimal>) -> Decimal {
    values.fold(Decimal::ZERO, Decimal::saturating_add)
}

fn profit_after(revenue: Decimal, cost: Decimal, google_ads: Decimal) -> Decimal {
    revenue.saturating_sub(cost).saturating_sub(google_ads)
}

/// (revenue, cost) per calendar month
fn monthly_totals(orders: &[Order]) -> HashMap<MonthKey, (Decimal, Decimal)> {
    let mut totals: HashMap<MonthKey, (Decimal, Decimal)> = HashMap::new();
    for order in orders {
        let entry = totals
            .entry(MonthKey::of(&order.created_at))
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        entry.0 = entry.0.saturating_add(order.revenue);
        entry.1 = entry.1.saturating_add(order.cost);
    }
    totals
}

/// Profit after advertising spend for the 12 months ending at `current`.
///
/// Months without a recorded spend count it as zero.
pub fn monthly_profit_after_ads(
    orders: &[Order],
    costs: &CostMap,
    current: MonthKey,
) -> Vec<MonthlyProfitAfterAds> {
    let totals = monthly_totals(orders);

    current
        .trailing(MONTHLY_SERIES_LEN)
        .into_iter()
        .map(|month| {
            let (revenue, cost) = totals
                .get(&month)
                .copied()
                .unwrap_or((Decimal::ZERO, Decimal::ZERO));
            let google_ads = costs.get(&month).copied().unwrap_or(Decimal::ZERO);

            MonthlyProfitAfterAds {
                month,
                name: month.label(),
                revenue: round_money(revenue),
                cost: round_money(cost),
                google_ads: round_money(google_ads),
                profit: round_money(profit_after(revenue, cost, google_ads)),
            }
        })
        .collect()
}

/// Revenue, cost, ad spend and profit for one month
pub fn month_summary(orders: &[Order], costs: &CostMap, month: MonthKey) -> MonthSummary {
    let (revenue, cost) = orders
        .iter()
        .filter(|order| MonthKey::of(&order.created_at) == month)
        .fold((Decimal::ZERO, Decimal::ZERO), |(revenue, cost), order| {
            (
                revenue.saturating_add(order.revenue),
                cost.saturating_add(order.cost),
            )
        });
    let google_ads = costs.get(&month).copied().unwrap_or(Decimal::ZERO);

    MonthSummary {
        month,
        revenue: round_money(revenue),
        cost: round_money(cost),
        google_ads: round_money(google_ads),
        profit: round_money(profit_after(revenue, cost, google_ads)),
    }
}

/// Headline totals over every order
pub fn dashboard_summary(orders: &[Order], visitors: u64) -> DashboardSummary {
    let total_orders = orders.len() as u64;
    let total_revenue = saturating_sum(orders.iter().map(|o| o.revenue));
    let total_cost = saturating_sum(orders.iter().map(|o| o.cost));

    let average_cart = if total_orders == 0 {
        Decimal::ZERO
    } else {
        total_revenue / Decimal::from(total_orders)
    };

    let conversion_rate = if visitors == 0 {
        Decimal::ZERO
    } else {
        (Decimal::from(total_orders) * Decimal::ONE_HUNDRED / Decimal::from(visitors))
            .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
    };

    DashboardSummary {
        total_orders,
        total_revenue: round_money(total_revenue),
        total_cost: round_money(total_cost),
        total_profit: round_money(total_revenue.saturating_sub(total_cost)),
        average_cart: round_money(average_cart),
        visitors,
        conversion_rate,
    }
}
