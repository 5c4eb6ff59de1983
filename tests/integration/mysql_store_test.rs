//! MySQL store integration tests
//!
//! Run against a real database (TEST_DATABASE_URL). Ignored by default.

#[path = "../helpers/mod.rs"]
mod helpers;

use helpers::*;
use reachdesk::core::ReportingTimezone;
use reachdesk::marketing_costs::{MarketingCostStore, MonthKey, MySqlMarketingCostRepository};
use reachdesk::orders::{MySqlOrderRepository, OrderStatus, OrderStore, OrderUpdate};
use reachdesk::promo_codes::{
    DiscountType, MySqlPromoCodeRepository, NewPromoCode, PromoCodeStore, PromoCodeUpdate,
};
use reachdesk::AppError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sqlx::MySqlPool;

async fn insert_order(pool: &MySqlPool, username: &str, followers: &str, price: Option<&str>, amount: Option<&str>) -> i64 {
    sqlx::query(
        r#"
        INSERT INTO orders (username, email, platform, followers, price, amount, cost, payment_status, created_at)
        VALUES (?, 'test@example.com', 'instagram', ?, ?, ?, NULL, 'succeeded', UTC_TIMESTAMP())
        "#,
    )
    .bind(username)
    .bind(followers)
    .bind(price)
    .bind(amount)
    .execute(pool)
    .await
    .expect("Failed to insert order")
    .last_insert_id() as i64
}

#[tokio::test]
#[ignore = "Requires test database configuration"]
async fn test_order_repository_normalizes_legacy_rows() {
    let pool = create_test_pool().await;
    let username = format!("it-{}", uuid::Uuid::new_v4());

    let priced = insert_order(&pool, &username, "250", Some("3.90"), None).await;
    let amount_only = insert_order(&pool, &username, "1000", None, Some("12.00")).await;
    let broken = insert_order(&pool, &username, "many", Some("1.00"), None).await;

    let repo = MySqlOrderRepository::new(pool.clone(), ReportingTimezone::utc());
    let orders = repo.list_orders().await.unwrap();

    let find = |id: i64| orders.iter().find(|o| o.id == id);
    assert_eq!(find(priced).unwrap().revenue, dec!(3.90));
    assert_eq!(find(amount_only).unwrap().revenue, dec!(12.00));
    assert_eq!(find(amount_only).unwrap().followers, 1000);
    assert!(find(broken).is_none());

    cleanup_orders(&pool, &[&username]).await;
}

#[tokio::test]
#[ignore = "Requires test database configuration"]
async fn test_order_repository_update_and_delete() {
    let pool = create_test_pool().await;
    let username = format!("it-{}", uuid::Uuid::new_v4());
    let id = insert_order(&pool, &username, "100", Some("2.50"), None).await;

    let repo = MySqlOrderRepository::new(pool.clone(), ReportingTimezone::utc());
    let update = OrderUpdate {
        status: Some(OrderStatus::Processing),
        notes: Some("queued".to_string()),
        cost: Some(dec!(0.75)),
    };
    repo.update_order(id, &update).await.unwrap();

    let order = repo
        .list_orders()
        .await
        .unwrap()
        .into_iter()
        .find(|o| o.id == id)
        .unwrap();
    assert_eq!(order.order_status, Some(OrderStatus::Processing));
    assert_eq!(order.notes.as_deref(), Some("queued"));
    assert_eq!(order.cost, dec!(0.75));

    repo.delete_order(id).await.unwrap();
    assert!(matches!(repo.delete_order(id).await, Err(AppError::NotFound(_))));
    assert!(matches!(
        repo.update_order(id, &update).await,
        Err(AppError::NotFound(_))
    ));

    cleanup_orders(&pool, &[&username]).await;
}

#[tokio::test]
#[ignore = "Requires test database configuration"]
async fn test_marketing_cost_upsert_overwrites() {
    let pool = create_test_pool().await;
    let repo = MySqlMarketingCostRepository::new(pool.clone());
    let month: MonthKey = "1999-07".parse().unwrap();

    repo.upsert_cost(month, dec!(10)).await.unwrap();
    repo.upsert_cost(month, dec!(42.50)).await.unwrap();

    let costs = repo.get_all_costs().await.unwrap();
    assert_eq!(costs.get(&month).copied(), Some(dec!(42.50)));

    repo.upsert_cost(month, Decimal::ZERO).await.unwrap();
    let costs = repo.get_all_costs().await.unwrap();
    assert_eq!(costs.get(&month).copied(), Some(Decimal::ZERO));

    sqlx::query("DELETE FROM marketing_costs WHERE month = ?")
        .bind(month.to_string())
        .execute(&pool)
        .await
        .unwrap();
}

#[tokio::test]
#[ignore = "Requires test database configuration"]
async fn test_promo_code_lifecycle() {
    let pool = create_test_pool().await;
    let repo = MySqlPromoCodeRepository::new(pool.clone());
    let code = format!("IT{}", &uuid::Uuid::new_v4().simple().to_string()[..12]);

    let created = repo
        .create_code(&NewPromoCode {
            code: code.clone(),
            discount_type: DiscountType::Percentage,
            discount_value: dec!(15),
            max_uses: Some(10),
            expires_at: None,
        })
        .await
        .unwrap();
    assert_eq!(created.code, code);
    assert_eq!(created.used_count, 0);
    assert!(created.is_active);

    let duplicate = repo
        .create_code(&NewPromoCode {
            code: code.to_lowercase(),
            discount_type: DiscountType::Fixed,
            discount_value: dec!(1),
            max_uses: None,
            expires_at: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(duplicate, AppError::Conflict(_)));

    let update = PromoCodeUpdate {
        discount_value: Some(dec!(20)),
        is_active: Some(false),
        ..Default::default()
    };
    repo.update_code(created.id, &update).await.unwrap();

    let stored = repo.find_code(created.id).await.unwrap().unwrap();
    assert_eq!(stored.discount_value, dec!(20));
    assert_eq!(stored.max_uses, Some(10));
    assert!(!stored.is_active);

    repo.delete_code(created.id).await.unwrap();
    assert!(matches!(
        repo.delete_code(created.id).await.unwrap_err(),
        AppError::NotFound(_)
    ));
}
