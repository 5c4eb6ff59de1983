//! Integration tests for the analytics flow
//!
//! Saves ad spend through the API and checks that the dashboard picks it up,
//! and that each store failure is handled the way the dashboard expects.

#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::{test, App};
use helpers::*;
use reachdesk::marketing_costs::MonthKey;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use std::sync::Arc;

fn current_month() -> MonthKey {
    MonthKey::of(&chrono::Utc::now().naive_utc())
}

fn orders_this_month() -> InMemoryOrderStore {
    let now = chrono::Utc::now().naive_utc();
    InMemoryOrderStore::with_orders(vec![
        TestDataFactory::instagram(1, dec!(100), dec!(40), now),
        TestDataFactory::instagram(2, dec!(50), dec!(10), now),
    ])
}

fn month_point<'a>(body: &'a Value, month: &MonthKey) -> &'a Value {
    body["monthlyProfit"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["month"] == month.to_string().as_str())
        .unwrap()
}

#[actix_web::test]
async fn test_saved_ad_spend_reduces_monthly_profit() {
    let services = test_services(
        Arc::new(orders_this_month()),
        Arc::new(InMemoryCostStore::default()),
    );
    let app = test::init_service(App::new().configure(app_config(services))).await;
    let month = current_month();

    // Before any spend is recorded
    let req = test::TestRequest::get()
        .uri("/admin/analytics")
        .insert_header(bearer(&admin_token()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let point = month_point(&body, &month);
    assert_eq!(json_decimal(&point["googleAds"]), Decimal::ZERO);
    assert_eq!(json_decimal(&point["profit"]), dec!(100));

    // Record spend for the current month
    let req = test::TestRequest::put()
        .uri("/admin/marketing-costs")
        .insert_header(bearer(&admin_token()))
        .set_json(json!({ "month": month.to_string(), "googleAdsCost": 30 }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);

    let req = test::TestRequest::get()
        .uri("/admin/analytics")
        .insert_header(bearer(&admin_token()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let point = month_point(&body, &month);
    assert_eq!(json_decimal(&point["revenue"]), dec!(150));
    assert_eq!(json_decimal(&point["cost"]), dec!(50));
    assert_eq!(json_decimal(&point["googleAds"]), dec!(30));
    assert_eq!(json_decimal(&point["profit"]), dec!(70));

    // The single-month preview agrees
    let req = test::TestRequest::get()
        .uri(&format!("/admin/analytics/month/{}", month))
        .insert_header(bearer(&admin_token()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(json_decimal(&body["profit"]), dec!(70));
}

#[actix_web::test]
async fn test_cost_store_failure_still_renders_dashboard() {
    let services = test_services(
        Arc::new(orders_this_month()),
        Arc::new(InMemoryCostStore::unavailable()),
    );
    let app = test::init_service(App::new().configure(app_config(services))).await;

    let req = test::TestRequest::get()
        .uri("/admin/analytics?range=month")
        .insert_header(bearer(&admin_token()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["costsAvailable"], false);
    assert!(body["monthlyProfit"]
        .as_array()
        .unwrap()
        .iter()
        .all(|p| json_decimal(&p["googleAds"]) == Decimal::ZERO));

    let point = month_point(&body, &current_month());
    assert_eq!(json_decimal(&point["profit"]), dec!(100));
}

#[actix_web::test]
async fn test_order_store_failure_fails_request() {
    let orders = Arc::new(orders_this_month());
    orders.set_failing(true);
    let services = test_services(orders, Arc::new(InMemoryCostStore::default()));
    let app = test::init_service(App::new().configure(app_config(services))).await;

    let req = test::TestRequest::get()
        .uri("/admin/analytics")
        .insert_header(bearer(&admin_token()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 500);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], 500);
}

#[actix_web::test]
async fn test_empty_store_yields_zero_series() {
    let services = test_services(
        Arc::new(InMemoryOrderStore::default()),
        Arc::new(InMemoryCostStore::default()),
    );
    let app = test::init_service(App::new().configure(app_config(services))).await;

    let req = test::TestRequest::get()
        .uri("/admin/analytics?range=year&visitors=0")
        .insert_header(bearer(&admin_token()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert!(body["revenue"]
        .as_array()
        .unwrap()
        .iter()
        .all(|p| json_decimal(&p["revenue"]) == Decimal::ZERO));
    assert_eq!(body["topPackages"], json!([]));
    assert_eq!(body["summary"]["totalOrders"], 0);
    assert_eq!(json_decimal(&body["summary"]["conversionRate"]), Decimal::ZERO);
}
