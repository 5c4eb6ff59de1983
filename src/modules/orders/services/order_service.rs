use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

use crate::core::money::{amount_from_json, MAX_AMOUNT};
use crate::core::{AppError, Result};
use crate::modules::orders::models::{Order, OrderStatus};
use crate::modules::orders::repositories::{OrderStore, OrderUpdate};

/// Body of `PUT /admin/orders/update`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderRequest {
    #[serde(default)]
    pub order_id: Option<i64>,
    #[serde(default)]
    pub order_status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub cost: Option<serde_json::Value>,
}

impl UpdateOrderRequest {
    /// Validate the request into an order id and a typed update
    pub fn into_update(self) -> Result<(i64, OrderUpdate)> {
        let order_id = self
            .order_id
            .filter(|id| *id > 0)
            .ok_or_else(|| AppError::validation("Order ID is required"))?;

        let status = self
            .order_status
            .as_deref()
            .map(str::parse::<OrderStatus>)
            .transpose()?;

        let cost = self.cost.as_ref().map(parse_cost).transpose()?;

        Ok((
            order_id,
            OrderUpdate {
                status,
                notes: self.notes,
                cost,
            },
        ))
    }
}

fn parse_cost(value: &serde_json::Value) -> Result<Decimal> {
    amount_from_json(value)
        .filter(|cost| *cost >= Decimal::ZERO && *cost <= MAX_AMOUNT)
        .ok_or_else(|| AppError::validation("Invalid cost. Must be a number >= 0"))
}

/// Admin operations on orders
pub struct OrderService {
    store: Arc<dyn OrderStore>,
}

impl OrderService {
    pub fn new(store: Arc<dyn OrderStore>) -> Self {
        Self { store }
    }

    pub async fn list_orders(&self) -> Result<Vec<Order>> {
        self.store.list_orders().await
    }

    pub async fn update_order(&self, request: UpdateOrderRequest) -> Result<()> {
        let (order_id, update) = request.into_update()?;

        if update.is_empty() {
            return Ok(());
        }

        self.store.update_order(order_id, &update).await?;

        info!(
            order_id,
            status = ?update.status,
            cost = ?update.cost,
            notes_changed = update.notes.is_some(),
            "Order updated"
        );

        Ok(())
    }

    pub async fn delete_order(&self, order_id: i64) -> Result<()> {
        self.store.delete_order(order_id).await?;
        info!(order_id, "Order deleted");
        Ok(())
    }
}
