//! Contract tests for the marketing cost API
//!
//! Validates GET and PUT /admin/marketing-costs: response shape, upsert
//! semantics and validation errors.

#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::{test, App};
use helpers::*;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use std::sync::Arc;

fn setup(costs: InMemoryCostStore) -> (reachdesk::Services, Arc<InMemoryCostStore>) {
    let costs = Arc::new(costs);
    let services = test_services(Arc::new(InMemoryOrderStore::default()), costs.clone());
    (services, costs)
}

#[actix_web::test]
async fn test_get_costs_structure() {
    let (services, _) = setup(InMemoryCostStore::with_costs(&[
        ("2024-01", dec!(120)),
        ("2024-02", dec!(95.50)),
    ]));
    let app = test::init_service(App::new().configure(app_config(services))).await;

    let req = test::TestRequest::get()
        .uri("/admin/marketing-costs")
        .insert_header(bearer(&admin_token()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    let costs = body["costs"].as_object().unwrap();
    assert_eq!(costs.len(), 2);
    assert!(costs["2024-01"].is_number());
    assert_eq!(json_decimal(&costs["2024-02"]), dec!(95.50));
}

#[actix_web::test]
async fn test_get_costs_empty() {
    let (services, _) = setup(InMemoryCostStore::default());
    let app = test::init_service(App::new().configure(app_config(services))).await;

    let req = test::TestRequest::get()
        .uri("/admin/marketing-costs")
        .insert_header(bearer(&admin_token()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "costs": {} }));
}

#[actix_web::test]
async fn test_put_cost_upserts() {
    let (services, store) = setup(InMemoryCostStore::default());
    let app = test::init_service(App::new().configure(app_config(services))).await;

    for cost in [json!(30), json!("45.25")] {
        let req = test::TestRequest::put()
            .uri("/admin/marketing-costs")
            .insert_header(bearer(&admin_token()))
            .set_json(json!({ "month": "2024-03", "googleAdsCost": cost }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "success": true }));
    }

    // Latest write wins, one entry per month
    let costs = store.snapshot();
    assert_eq!(costs.len(), 1);
    assert_eq!(costs.values().next().copied(), Some(dec!(45.25)));
}

#[actix_web::test]
async fn test_put_rejects_invalid_input() {
    let (services, store) = setup(InMemoryCostStore::default());
    let app = test::init_service(App::new().configure(app_config(services))).await;

    let payloads = [
        (json!({ "month": "2024-3", "googleAdsCost": 10 }), "month"),
        (json!({ "month": "2024/03", "googleAdsCost": 10 }), "month"),
        (json!({ "googleAdsCost": 10 }), "month"),
        (json!({ "month": "2024-03", "googleAdsCost": -1 }), "googleAdsCost"),
        (json!({ "month": "2024-03", "googleAdsCost": "ten" }), "googleAdsCost"),
        (json!({ "month": "2024-03" }), "googleAdsCost"),
        (json!({ "month": "2024-03", "googleAdsCost": 12.345 }), "googleAdsCost"),
        (json!({ "month": "2024-03", "googleAdsCost": "10000000000" }), "googleAdsCost"),
    ];

    for (payload, field) in payloads {
        let req = test::TestRequest::put()
            .uri("/admin/marketing-costs")
            .insert_header(bearer(&admin_token()))
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400, "payload {} accepted", payload);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], 400);
        assert!(
            body["error"]["message"].as_str().unwrap().contains(field),
            "payload {} reported {}",
            payload,
            body["error"]["message"]
        );
    }

    assert!(store.snapshot().is_empty());
}

#[actix_web::test]
async fn test_put_rejects_non_json_body() {
    let (services, _) = setup(InMemoryCostStore::default());
    let app = test::init_service(App::new().configure(app_config(services))).await;

    let req = test::TestRequest::put()
        .uri("/admin/marketing-costs")
        .insert_header(bearer(&admin_token()))
        .insert_header(("content-type", "application/json"))
        .set_payload("month=2024-03")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn test_costs_require_token() {
    let (services, store) = setup(InMemoryCostStore::default());
    let app = test::init_service(App::new().configure(app_config(services))).await;

    let get = test::TestRequest::get().uri("/admin/marketing-costs").to_request();
    assert_eq!(test::call_service(&app, get).await.status(), 401);

    let put = test::TestRequest::put()
        .uri("/admin/marketing-costs")
        .set_json(json!({ "month": "2024-03", "googleAdsCost": 10 }))
        .to_request();
    assert_eq!(test::call_service(&app, put).await.status(), 401);
    assert!(store.snapshot().is_empty());
}

#[actix_web::test]
async fn test_store_failure_is_500() {
    let (services, _) = setup(InMemoryCostStore::unavailable());
    let app = test::init_service(App::new().configure(app_config(services))).await;

    let req = test::TestRequest::get()
        .uri("/admin/marketing-costs")
        .insert_header(bearer(&admin_token()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 500);

    let body: Value = test::read_body_json(resp).await;
    assert!(!body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("marketing_costs table"));
}
