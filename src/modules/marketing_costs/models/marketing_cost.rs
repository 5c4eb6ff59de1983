use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::core::{AppError, Result};

/// Calendar month in canonical `YYYY-MM` form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(0..=9999).contains(&year) || !(1..=12).contains(&month) {
            return Err(AppError::validation(format!(
                "Invalid month {}-{}. Expected YYYY-MM",
                year, month
            )));
        }
        Ok(Self { year, month })
    }

    /// Month containing the given date
    pub fn of<D: Datelike>(date: &D) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// `count` consecutive months ending at (and including) `self`, oldest first
    pub fn trailing(self, count: usize) -> Vec<Self> {
        let mut months: Vec<Self> = std::iter::successors(Some(self), |m| Some(m.previous()))
            .take(count)
            .collect();
        months.reverse();
        months
    }

    /// Short month name, e.g. "Jan"
    pub fn label(&self) -> String {
        self.first_day().format("%b").to_string()
    }
}

impl FromStr for MonthKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || AppError::validation("Invalid month. Expected YYYY-MM");

        let bytes = s.as_bytes();
        let shaped = bytes.len() == 7
            && bytes[4] == b'-'
            && bytes[..4].iter().all(u8::is_ascii_digit)
            && bytes[5..].iter().all(u8::is_ascii_digit);
        if !shaped {
            return Err(invalid());
        }

        let year = s[..4].parse().map_err(|_| invalid())?;
        let month = s[5..].parse().map_err(|_| invalid())?;
        MonthKey::new(year, month).map_err(|_| invalid())
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Advertising spend recorded for one month
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyCost {
    pub month: MonthKey,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub google_ads_cost: Decimal,
}

/// Month -> advertising spend
pub type CostMap = BTreeMap<MonthKey, Decimal>;

/// Stored marketing cost row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MarketingCostRow {
    pub month: String,
    pub google_ads_cost: Decimal,
}

impl MarketingCostRow {
    pub fn into_monthly_cost(self) -> Result<MonthlyCost> {
        Ok(MonthlyCost {
            month: self.month.parse()?,
            google_ads_cost: self.google_ads_cost,
        })
    }
}
