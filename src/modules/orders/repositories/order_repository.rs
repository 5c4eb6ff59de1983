use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::MySqlPool;

use crate::core::{AppError, ReportingTimezone, Result};
use crate::modules::orders::models::{normalize_rows, Order, OrderRow, OrderStatus};

/// Fields an admin may change on an existing order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderUpdate {
    pub status: Option<OrderStatus>,
    pub notes: Option<String>,
    pub cost: Option<Decimal>,
}

impl OrderUpdate {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.notes.is_none() && self.cost.is_none()
    }
}

/// Order store consumed by the admin API and analytics
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// All orders, newest first, in canonical shape
    async fn list_orders(&self) -> Result<Vec<Order>>;

    /// Apply an update; `NotFound` when the order does not exist
    async fn update_order(&self, id: i64, update: &OrderUpdate) -> Result<()>;

    /// Delete an order; `NotFound` when the order does not exist
    async fn delete_order(&self, id: i64) -> Result<()>;
}

/// MySQL-backed order store
#[derive(Clone)]
pub struct MySqlOrderRepository {
    pool: MySqlPool,
    timezone: ReportingTimezone,
}

impl MySqlOrderRepository {
    pub fn new(pool: MySqlPool, timezone: ReportingTimezone) -> Self {
        Self { pool, timezone }
    }
}

#[async_trait]
impl OrderStore for MySqlOrderRepository {
    async fn list_orders(&self) -> Result<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT id, username, email, platform, followers, price, amount, cost,
                   payment_status, order_status, notes, created_at
            FROM orders
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let fetched = rows.len();
        let orders = normalize_rows(rows, &self.timezone);

        tracing::debug!(fetched, usable = orders.len(), "Loaded orders");

        Ok(orders)
    }

    async fn update_order(&self, id: i64, update: &OrderUpdate) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        // MySQL reports unchanged rows as unaffected, so check existence explicitly
        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM orders WHERE id = ? FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        if exists.is_none() {
            return Err(AppError::not_found(format!("Order {}", id)));
        }

        if let Some(status) = update.status {
            sqlx::query("UPDATE orders SET order_status = ? WHERE id = ?")
                .bind(status.as_str())
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        if let Some(notes) = &update.notes {
            sqlx::query("UPDATE orders SET notes = ? WHERE id = ?")
                .bind(notes)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        if let Some(cost) = update.cost {
            sqlx::query("UPDATE orders SET cost = ? WHERE id = ?")
                .bind(cost.to_string())
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    async fn delete_order(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM orders WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Order {}", id)));
        }

        Ok(())
    }
}
