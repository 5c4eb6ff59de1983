use chrono::NaiveDateTime;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::money::parse_amount;
use crate::core::{AppError, ReportingTimezone, Result};

/// Social platform an order was placed for
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Platform {
    Instagram,
    Tiktok,
    /// Legacy package shape, still present in old rows
    Youtube,
    Other(String),
}

impl Platform {
    /// Platforms shown in the distribution chart, in display order
    pub const REPORTED: [Platform; 2] = [Platform::Instagram, Platform::Tiktok];

    pub fn as_str(&self) -> &str {
        match self {
            Platform::Instagram => "instagram",
            Platform::Tiktok => "tiktok",
            Platform::Youtube => "youtube",
            Platform::Other(name) => name,
        }
    }
}

impl From<&str> for Platform {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "instagram" => Platform::Instagram,
            "tiktok" => Platform::Tiktok,
            "youtube" => Platform::Youtube,
            _ => Platform::Other(value.trim().to_string()),
        }
    }
}

impl From<String> for Platform {
    fn from(value: String) -> Self {
        Platform::from(value.as_str())
    }
}

impl From<Platform> for String {
    fn from(value: Platform) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fulfillment status maintained by admins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            _ => Err(AppError::validation(
                "Invalid status. Must be: pending, processing, completed, or cancelled",
            )),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical order shape consumed by analytics and the admin API.
///
/// Revenue is already coalesced from the stored `price`/`amount` columns and
/// `created_at` is expressed in the reporting timezone.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub platform: Platform,
    pub followers: u32,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub revenue: Decimal,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub cost: Decimal,
    pub created_at: NaiveDateTime,
    pub username: Option<String>,
    pub email: Option<String>,
    pub payment_status: Option<String>,
    pub order_status: Option<OrderStatus>,
    pub notes: Option<String>,
}

impl Order {
    pub fn new(
        id: i64,
        platform: Platform,
        followers: u32,
        revenue: Decimal,
        cost: Decimal,
        created_at: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            platform,
            followers,
            revenue,
            cost,
            created_at,
            username: None,
            email: None,
            payment_status: None,
            order_status: None,
            notes: None,
        }
    }

    /// Revenue minus fulfillment cost
    pub fn gross_profit(&self) -> Decimal {
        self.revenue.saturating_sub(self.cost)
    }
}

/// Order as persisted, before normalization.
///
/// Numeric columns are text because two writers disagree on the schema;
/// JSON payloads may carry them as numbers or strings.
#[derive(Debug, Clone, Default, Deserialize, sqlx::FromRow)]
pub struct OrderRow {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub platform: String,
    #[serde(deserialize_with = "required_text")]
    pub followers: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub price: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub amount: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub cost: Option<String>,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub order_status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

impl OrderRow {
    /// Effective revenue: `price`, else `amount`, else zero
    pub fn effective_revenue(&self) -> Decimal {
        self.price
            .as_deref()
            .and_then(parse_amount)
            .or_else(|| self.amount.as_deref().and_then(parse_amount))
            .unwrap_or(Decimal::ZERO)
    }

    pub fn effective_cost(&self) -> Decimal {
        self.cost
            .as_deref()
            .and_then(parse_amount)
            .unwrap_or(Decimal::ZERO)
    }

    /// Convert into the canonical shape.
    ///
    /// Fails only when `followers` is not a positive integer; garbled money
    /// fields degrade to zero instead.
    pub fn normalize(self, timezone: &ReportingTimezone) -> Result<Order> {
        let followers = parse_followers(&self.followers).ok_or_else(|| {
            AppError::validation(format!(
                "Order {} has invalid followers value '{}'",
                self.id, self.followers
            ))
        })?;

        let revenue = self.effective_revenue();
        let cost = self.effective_cost();

        Ok(Order {
            id: self.id,
            platform: Platform::from(self.platform),
            followers,
            revenue,
            cost,
            created_at: timezone.localize(self.created_at),
            username: self.username,
            email: self.email,
            payment_status: self.payment_status,
            order_status: self.order_status.as_deref().and_then(|s| s.parse().ok()),
            notes: self.notes,
        })
    }
}

/// Normalize a batch of stored rows, skipping unusable records
pub fn normalize_rows(rows: Vec<OrderRow>, timezone: &ReportingTimezone) -> Vec<Order> {
    rows.into_iter()
        .filter_map(|row| match row.normalize(timezone) {
            Ok(order) => Some(order),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping order that cannot be reported");
                None
            }
        })
        .collect()
}

fn parse_followers(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    let followers = match trimmed.parse::<u32>() {
        Ok(value) => value,
        Err(_) => {
            let value = parse_amount(trimmed)?;
            if !value.fract().is_zero() {
                return None;
            }
            value.to_u32()?
        }
    };

    (followers > 0).then_some(followers)
}

fn json_to_text(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(json_to_text(serde_json::Value::deserialize(deserializer)?))
}

fn required_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(json_to_text(serde_json::Value::deserialize(deserializer)?).unwrap_or_default())
}
