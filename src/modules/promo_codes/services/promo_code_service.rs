use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

use crate::core::money::{amount_from_json, is_storable_amount};
use crate::core::{AppError, Result};
use crate::modules::promo_codes::models::{
    DiscountType, NewPromoCode, PromoCode, PromoCodeUpdate, MAX_CODE_LEN,
};
use crate::modules::promo_codes::repositories::PromoCodeStore;

/// Body of `POST /admin/promo-codes`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePromoCodeRequest {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub discount_type: Option<String>,
    #[serde(default)]
    pub discount_value: Option<serde_json::Value>,
    #[serde(default)]
    pub max_uses: Option<serde_json::Value>,
    #[serde(default)]
    pub expires_at: Option<String>,
}

impl CreatePromoCodeRequest {
    pub fn validate(&self) -> Result<NewPromoCode> {
        let (code, discount_type, discount_value) =
            match (&self.code, &self.discount_type, &self.discount_value) {
                (Some(code), Some(discount_type), Some(value))
                    if !code.trim().is_empty() && !value.is_null() =>
                {
                    (code.trim(), discount_type, value)
                }
                _ => {
                    return Err(AppError::validation(
                        "Code, discount_type, and discount_value are required",
                    ))
                }
            };

        if code.chars().count() > MAX_CODE_LEN {
            return Err(AppError::validation(format!(
                "Code must be at most {} characters",
                MAX_CODE_LEN
            )));
        }

        let discount_type: DiscountType = discount_type.parse()?;
        let discount_value = parse_discount_value(discount_value)?;
        discount_type.validate_value(discount_value)?;

        Ok(NewPromoCode {
            code: code.to_string(),
            discount_type,
            discount_value,
            max_uses: parse_max_uses(self.max_uses.as_ref())?,
            expires_at: parse_expiry(self.expires_at.as_deref())?,
        })
    }
}

/// Body of `PUT /admin/promo-codes`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePromoCodeRequest {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub discount_type: Option<String>,
    #[serde(default)]
    pub discount_value: Option<serde_json::Value>,
    #[serde(default)]
    pub max_uses: Option<serde_json::Value>,
    #[serde(default)]
    pub expires_at: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl UpdatePromoCodeRequest {
    /// Validate field shapes; the percentage bound is checked against the
    /// stored code by the service
    pub fn into_update(self) -> Result<(i64, PromoCodeUpdate)> {
        let id = self
            .id
            .filter(|id| *id > 0)
            .ok_or_else(|| AppError::validation("ID is required"))?;

        let discount_type = self
            .discount_type
            .as_deref()
            .map(str::parse::<DiscountType>)
            .transpose()?;

        let discount_value = self
            .discount_value
            .as_ref()
            .filter(|value| !value.is_null())
            .map(parse_discount_value)
            .transpose()?;

        Ok((
            id,
            PromoCodeUpdate {
                discount_type,
                discount_value,
                max_uses: parse_max_uses(self.max_uses.as_ref())?,
                expires_at: parse_expiry(self.expires_at.as_deref())?,
                is_active: self.is_active,
            },
        ))
    }
}

fn parse_discount_value(value: &serde_json::Value) -> Result<Decimal> {
    amount_from_json(value)
        .filter(|value| *value < Decimal::ZERO || is_storable_amount(*value))
        .ok_or_else(|| {
            AppError::validation("discount_value must be a number with at most 2 decimals")
        })
}

/// Missing, null or zero means unlimited
fn parse_max_uses(value: Option<&serde_json::Value>) -> Result<Option<u32>> {
    let Some(value) = value.filter(|v| !v.is_null()) else {
        return Ok(None);
    };

    let uses = amount_from_json(value)
        .filter(|uses| uses.fract().is_zero())
        .and_then(|uses| uses.to_u32())
        .ok_or_else(|| AppError::validation("max_uses must be a positive integer"))?;

    Ok((uses > 0).then_some(uses))
}

/// Accepts `YYYY-MM-DDTHH:MM[:SS]`, RFC 3339 (converted to UTC) or a bare
/// date, which expires at the end of that day. Empty means no expiry.
fn parse_expiry(raw: Option<&str>) -> Result<Option<NaiveDateTime>> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    let parsed = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_utc()))
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(23, 59, 59))
        });

    parsed
        .map(Some)
        .ok_or_else(|| AppError::validation("expires_at must be a date or date-time"))
}

/// Admin management of checkout promo codes
pub struct PromoCodeService {
    store: Arc<dyn PromoCodeStore>,
}

impl PromoCodeService {
    pub fn new(store: Arc<dyn PromoCodeStore>) -> Self {
        Self { store }
    }

    pub async fn list_codes(&self) -> Result<Vec<PromoCode>> {
        self.store.list_codes().await
    }

    pub async fn create_code(&self, request: &CreatePromoCodeRequest) -> Result<PromoCode> {
        let new_code = request.validate()?;
        let created = self.store.create_code(&new_code).await?;

        info!(
            id = created.id,
            code = %created.code,
            discount_type = %created.discount_type,
            discount_value = %created.discount_value,
            "Promo code created"
        );

        Ok(created)
    }

    pub async fn update_code(&self, request: UpdatePromoCodeRequest) -> Result<()> {
        let (id, update) = request.into_update()?;

        if update.is_empty() {
            return Ok(());
        }

        // A value change must still fit the type it ends up paired with
        if update.discount_type.is_some() || update.discount_value.is_some() {
            let mut merged = self
                .store
                .find_code(id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Promo code {}", id)))?;
            update.apply(&mut merged);
            merged.discount_type.validate_value(merged.discount_value)?;
        }

        self.store.update_code(id, &update).await?;

        info!(id, is_active = ?update.is_active, "Promo code updated");

        Ok(())
    }

    pub async fn delete_code(&self, id: i64) -> Result<()> {
        self.store.delete_code(id).await?;
        info!(id, "Promo code deleted");
        Ok(())
    }
}
