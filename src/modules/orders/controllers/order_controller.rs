use actix_web::{web, HttpResponse};

use crate::core::{AppError, Result};
use crate::modules::orders::services::{OrderService, UpdateOrderRequest};

/// List all orders, newest first
/// GET /admin/orders
pub async fn list_orders(service: web::Data<OrderService>) -> Result<HttpResponse> {
    let orders = service.list_orders().await?;
    Ok(HttpResponse::Ok().json(orders))
}

/// Update status, notes or fulfillment cost of an order
/// PUT /admin/orders/update
pub async fn update_order(
    service: web::Data<OrderService>,
    request: web::Json<UpdateOrderRequest>,
) -> Result<HttpResponse> {
    service.update_order(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}

/// Delete an order
/// DELETE /admin/orders/{id}
pub async fn delete_order(
    service: web::Data<OrderService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let order_id = path
        .parse::<i64>()
        .map_err(|_| AppError::validation("Invalid order ID"))?;

    service.delete_order(order_id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}

/// Configure order routes (mounted under the admin scope)
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/orders")
            .route("", web::get().to(list_orders))
            .route("/update", web::put().to(update_order))
            .route("/{id}", web::delete().to(delete_order)),
    );
}
