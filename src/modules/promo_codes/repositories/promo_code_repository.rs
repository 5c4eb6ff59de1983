use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::core::{AppError, Result};
use crate::modules::promo_codes::models::{NewPromoCode, PromoCode, PromoCodeRow, PromoCodeUpdate};

const PROMO_CODE_COLUMNS: &str = "id, code, discount_type, discount_value, max_uses, used_count, \
     expires_at, is_active, created_at";

/// Store for checkout promo codes
#[async_trait]
pub trait PromoCodeStore: Send + Sync {
    /// All codes, newest first
    async fn list_codes(&self) -> Result<Vec<PromoCode>>;

    async fn find_code(&self, id: i64) -> Result<Option<PromoCode>>;

    /// Insert a code; `Conflict` when the code already exists
    async fn create_code(&self, code: &NewPromoCode) -> Result<PromoCode>;

    /// Apply an update; `NotFound` when the code does not exist
    async fn update_code(&self, id: i64, update: &PromoCodeUpdate) -> Result<()>;

    /// Delete a code; `NotFound` when the code does not exist
    async fn delete_code(&self, id: i64) -> Result<()>;
}

/// MySQL-backed promo code store
#[derive(Clone)]
pub struct MySqlPromoCodeRepository {
    pool: MySqlPool,
}

impl MySqlPromoCodeRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PromoCodeStore for MySqlPromoCodeRepository {
    async fn list_codes(&self) -> Result<Vec<PromoCode>> {
        let rows = sqlx::query_as::<_, PromoCodeRow>(&format!(
            "SELECT {} FROM promo_codes ORDER BY created_at DESC, id DESC",
            PROMO_CODE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        let mut codes = Vec::with_capacity(rows.len());
        for row in rows {
            match row.into_promo_code() {
                Ok(code) => codes.push(code),
                Err(e) => tracing::warn!(error = %e, "Skipping malformed promo code row"),
            }
        }

        Ok(codes)
    }

    async fn find_code(&self, id: i64) -> Result<Option<PromoCode>> {
        let row = sqlx::query_as::<_, PromoCodeRow>(&format!(
            "SELECT {} FROM promo_codes WHERE id = ?",
            PROMO_CODE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(PromoCodeRow::into_promo_code).transpose()
    }

    async fn create_code(&self, code: &NewPromoCode) -> Result<PromoCode> {
        let result = sqlx::query(
            r#"
            INSERT INTO promo_codes (code, discount_type, discount_value, max_uses, expires_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&code.code)
        .bind(code.discount_type.as_str())
        .bind(code.discount_value)
        .bind(code.max_uses)
        .bind(code.expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::conflict("This promo code already exists")
            }
            _ => AppError::from(e),
        })?;

        let id = result.last_insert_id() as i64;
        self.find_code(id)
            .await?
            .ok_or_else(|| AppError::internal(format!("Promo code {} vanished after insert", id)))
    }

    async fn update_code(&self, id: i64, update: &PromoCodeUpdate) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let exists: Option<i64> =
            sqlx::query_scalar("SELECT id FROM promo_codes WHERE id = ? FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        if exists.is_none() {
            return Err(AppError::not_found(format!("Promo code {}", id)));
        }

        sqlx::query(
            r#"
            UPDATE promo_codes
            SET discount_type = COALESCE(?, discount_type),
                discount_value = COALESCE(?, discount_value),
                max_uses = COALESCE(?, max_uses),
                expires_at = COALESCE(?, expires_at),
                is_active = COALESCE(?, is_active)
            WHERE id = ?
            "#,
        )
        .bind(update.discount_type.map(|t| t.as_str()))
        .bind(update.discount_value)
        .bind(update.max_uses)
        .bind(update.expires_at)
        .bind(update.is_active)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }

    async fn delete_code(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM promo_codes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Promo code {}", id)));
        }

        Ok(())
    }
}
