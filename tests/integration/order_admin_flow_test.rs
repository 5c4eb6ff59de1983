//! Integration tests for order administration
//!
//! List, update and delete orders through the admin API, and check that cost
//! edits flow through to analytics.

#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::{test, App};
use helpers::*;
use reachdesk::orders::OrderStatus;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use std::sync::Arc;

fn store() -> Arc<InMemoryOrderStore> {
    let now = chrono::Utc::now().naive_utc();
    Arc::new(InMemoryOrderStore::with_orders(vec![
        TestDataFactory::instagram(1, dec!(10), dec!(2), now - chrono::Duration::hours(2)),
        TestDataFactory::instagram(2, dec!(20), dec!(5), now - chrono::Duration::hours(1)),
    ]))
}

#[actix_web::test]
async fn test_list_orders_newest_first() {
    let orders = store();
    let services = test_services(orders, Arc::new(InMemoryCostStore::default()));
    let app = test::init_service(App::new().configure(app_config(services))).await;

    let req = test::TestRequest::get()
        .uri("/admin/orders")
        .insert_header(bearer(&admin_token()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["id"], 2);
    assert_eq!(list[0]["platform"], "instagram");
    assert!(list[0]["createdAt"].is_string());
    assert_eq!(json_decimal(&list[0]["revenue"]), dec!(20));
}

#[actix_web::test]
async fn test_update_order_fields() {
    let orders = store();
    let services = test_services(orders.clone(), Arc::new(InMemoryCostStore::default()));
    let app = test::init_service(App::new().configure(app_config(services))).await;

    let req = test::TestRequest::put()
        .uri("/admin/orders/update")
        .insert_header(bearer(&admin_token()))
        .set_json(json!({
            "orderId": 1,
            "orderStatus": "completed",
            "notes": "delivered in two batches",
            "cost": "3.50"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "success": true }));

    let updated = orders.snapshot().into_iter().find(|o| o.id == 1).unwrap();
    assert_eq!(updated.order_status, Some(OrderStatus::Completed));
    assert_eq!(updated.notes.as_deref(), Some("delivered in two batches"));
    assert_eq!(updated.cost, dec!(3.50));
}

#[actix_web::test]
async fn test_update_validation_errors() {
    let orders = store();
    let services = test_services(orders.clone(), Arc::new(InMemoryCostStore::default()));
    let app = test::init_service(App::new().configure(app_config(services))).await;

    let cases = [
        (json!({ "orderStatus": "completed" }), 400),
        (json!({ "orderId": 1, "orderStatus": "shipped" }), 400),
        (json!({ "orderId": 1, "cost": -2 }), 400),
        (json!({ "orderId": 1, "cost": "free" }), 400),
        (json!({ "orderId": 99, "notes": "ghost" }), 404),
    ];

    for (payload, status) in cases {
        let req = test::TestRequest::put()
            .uri("/admin/orders/update")
            .insert_header(bearer(&admin_token()))
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), status, "payload {}", payload);
    }

    let untouched = orders.snapshot().into_iter().find(|o| o.id == 1).unwrap();
    assert_eq!(untouched.order_status, None);
    assert_eq!(untouched.cost, dec!(2));
}

#[actix_web::test]
async fn test_delete_order() {
    let orders = store();
    let services = test_services(orders.clone(), Arc::new(InMemoryCostStore::default()));
    let app = test::init_service(App::new().configure(app_config(services))).await;

    let req = test::TestRequest::delete()
        .uri("/admin/orders/1")
        .insert_header(bearer(&admin_token()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);
    assert_eq!(orders.snapshot().len(), 1);

    let req = test::TestRequest::delete()
        .uri("/admin/orders/1")
        .insert_header(bearer(&admin_token()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);

    let req = test::TestRequest::delete()
        .uri("/admin/orders/abc")
        .insert_header(bearer(&admin_token()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 400);
}

#[actix_web::test]
async fn test_cost_edit_changes_profit() {
    let orders = store();
    let services = test_services(orders, Arc::new(InMemoryCostStore::default()));
    let app = test::init_service(App::new().configure(app_config(services))).await;

    let req = test::TestRequest::put()
        .uri("/admin/orders/update")
        .insert_header(bearer(&admin_token()))
        .set_json(json!({ "orderId": 2, "cost": 15 }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);

    let req = test::TestRequest::get()
        .uri("/admin/analytics")
        .insert_header(bearer(&admin_token()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    // 10 - 2 + 20 - 15
    assert_eq!(json_decimal(&body["summary"]["totalProfit"]), dec!(13));
}

#[actix_web::test]
async fn test_orders_require_token() {
    let services = test_services(store(), Arc::new(InMemoryCostStore::default()));
    let app = test::init_service(App::new().configure(app_config(services))).await;

    let req = test::TestRequest::delete().uri("/admin/orders/1").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 401);
}
