use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::{AppError, Result};

/// Longest code the `promo_codes.code` column holds
pub const MAX_CODE_LEN: usize = 50;

/// Upper bound of a percentage discount
pub const MAX_PERCENTAGE: Decimal = Decimal::ONE_HUNDRED;

/// How a promo code reduces the price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    /// `discount_value` percent off, 0 to 100
    Percentage,
    /// `discount_value` euros off
    Fixed,
}

impl DiscountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountType::Percentage => "percentage",
            DiscountType::Fixed => "fixed",
        }
    }

    /// Check a discount value against this type
    pub fn validate_value(&self, value: Decimal) -> Result<()> {
        if value < Decimal::ZERO {
            return Err(AppError::validation("discount_value must be a number >= 0"));
        }
        if *self == DiscountType::Percentage && value > MAX_PERCENTAGE {
            return Err(AppError::validation(
                "Percentage discount must be between 0 and 100",
            ));
        }
        Ok(())
    }
}

impl FromStr for DiscountType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "percentage" => Ok(DiscountType::Percentage),
            "fixed" => Ok(DiscountType::Fixed),
            _ => Err(AppError::validation(
                "discount_type must be \"percentage\" or \"fixed\"",
            )),
        }
    }
}

impl fmt::Display for DiscountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Promo code as returned by the admin API
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromoCode {
    pub id: i64,
    pub code: String,
    pub discount_type: DiscountType,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub discount_value: Decimal,
    pub max_uses: Option<u32>,
    pub used_count: u32,
    pub expires_at: Option<NaiveDateTime>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

/// Validated input for a new promo code
#[derive(Debug, Clone, PartialEq)]
pub struct NewPromoCode {
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub max_uses: Option<u32>,
    pub expires_at: Option<NaiveDateTime>,
}

/// Fields an admin may change on an existing promo code
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PromoCodeUpdate {
    pub discount_type: Option<DiscountType>,
    pub discount_value: Option<Decimal>,
    pub max_uses: Option<u32>,
    pub expires_at: Option<NaiveDateTime>,
    pub is_active: Option<bool>,
}

impl PromoCodeUpdate {
    pub fn is_empty(&self) -> bool {
        self.discount_type.is_none()
            && self.discount_value.is_none()
            && self.max_uses.is_none()
            && self.expires_at.is_none()
            && self.is_active.is_none()
    }

    /// Apply onto an existing code
    pub fn apply(&self, promo: &mut PromoCode) {
        if let Some(discount_type) = self.discount_type {
            promo.discount_type = discount_type;
        }
        if let Some(value) = self.discount_value {
            promo.discount_value = value;
        }
        if let Some(max_uses) = self.max_uses {
            promo.max_uses = Some(max_uses);
        }
        if let Some(expires_at) = self.expires_at {
            promo.expires_at = Some(expires_at);
        }
        if let Some(is_active) = self.is_active {
            promo.is_active = is_active;
        }
    }
}

/// Promo code as stored
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PromoCodeRow {
    pub id: i64,
    pub code: String,
    pub discount_type: String,
    pub discount_value: Decimal,
    pub max_uses: Option<u32>,
    pub used_count: u32,
    pub expires_at: Option<NaiveDateTime>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

impl PromoCodeRow {
    pub fn into_promo_code(self) -> Result<PromoCode> {
        Ok(PromoCode {
            id: self.id,
            code: self.code,
            discount_type: self.discount_type.parse()?,
            discount_value: self.discount_value,
            max_uses: self.max_uses,
            used_count: self.used_count,
            expires_at: self.expires_at,
            is_active: self.is_active,
            created_at: self.created_at,
        })
    }
}
