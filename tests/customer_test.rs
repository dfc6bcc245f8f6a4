//! 顾客花名册聚合与黑名单管理 (黑名单只做标记, 不拦截下单)

mod common;

use std::time::Duration;

use diancan_backend::AppError;
use diancan_backend::models::{AddBlacklistRequest, CheckoutRequest, CustomerQuery};
use diancan_backend::services::{
    CartService, CartStore, ContextCache, CustomerService, OrderService,
};
use diancan_backend::utils::PaginationParams;

async fn checkout(db: &sea_orm::DatabaseConnection, customer_id: i64, dish_id: i64, qty: i64) {
    let store = CartStore::new();
    let cart = CartService::new(db.clone(), store.clone());
    let orders_service =
        OrderService::new(db.clone(), store, ContextCache::new(Duration::from_secs(60)));
    cart.add_item(customer_id, dish_id, Some(qty)).await.unwrap();
    orders_service
        .checkout(customer_id, CheckoutRequest { remarks: None })
        .await
        .unwrap();
}

fn default_query() -> CustomerQuery {
    CustomerQuery {
        sort_by: None,
        page: None,
        per_page: None,
    }
}

#[tokio::test]
async fn roster_aggregates_per_customer() {
    let db = common::setup_db().await;
    let owner = common::seed_owner(&db, "laoban").await;
    let restaurant_id = common::seed_restaurant(&db, owner.id, "小面馆").await;
    let dish_id = common::seed_dish(&db, restaurant_id, owner.id, "牛肉面", 20.0).await;
    let big_spender = common::seed_customer(&db, "dakehu").await;
    let casual = common::seed_customer(&db, "sanke").await;

    checkout(&db, big_spender.id, dish_id, 2).await;
    checkout(&db, big_spender.id, dish_id, 1).await;
    checkout(&db, casual.id, dish_id, 1).await;

    let service = CustomerService::new(db.clone());
    let roster = service
        .list_customers(restaurant_id, owner.id, default_query())
        .await
        .unwrap();
    assert_eq!(roster.pagination.total, 2);

    // 默认按累计消费额降序
    let first = &roster.items[0];
    assert_eq!(first.username, "dakehu");
    assert_eq!(first.order_count, 2);
    assert_eq!(first.total_spent, 60.0);
    assert!(!first.is_blacklisted);
}

#[tokio::test]
async fn customer_detail_includes_favorite_dishes() {
    let db = common::setup_db().await;
    let owner = common::seed_owner(&db, "laoban").await;
    let restaurant_id = common::seed_restaurant(&db, owner.id, "小面馆").await;
    let noodles = common::seed_dish(&db, restaurant_id, owner.id, "牛肉面", 20.0).await;
    let cola = common::seed_dish(&db, restaurant_id, owner.id, "可乐", 5.0).await;
    let customer = common::seed_customer(&db, "guke").await;

    checkout(&db, customer.id, noodles, 3).await;
    checkout(&db, customer.id, cola, 1).await;

    let detail = CustomerService::new(db.clone())
        .get_customer_detail(restaurant_id, customer.id, owner.id)
        .await
        .unwrap();
    assert_eq!(detail.order_count, 2);
    assert_eq!(detail.total_spent, 65.0);
    assert_eq!(detail.favorite_dishes[0].dish_name, "牛肉面");
    assert_eq!(detail.favorite_dishes[0].total_quantity, 3);
}

#[tokio::test]
async fn blacklist_add_remove_and_duplicates() {
    let db = common::setup_db().await;
    let owner = common::seed_owner(&db, "laoban").await;
    let restaurant_id = common::seed_restaurant(&db, owner.id, "小面馆").await;
    let customer = common::seed_customer(&db, "guke").await;

    let service = CustomerService::new(db.clone());
    service
        .add_to_blacklist(
            restaurant_id,
            owner.id,
            AddBlacklistRequest {
                user_id: customer.id,
                reason: Some("恶意差评".to_string()),
            },
        )
        .await
        .unwrap();

    let err = service
        .add_to_blacklist(
            restaurant_id,
            owner.id,
            AddBlacklistRequest {
                user_id: customer.id,
                reason: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));

    let entries = service
        .list_blacklist(restaurant_id, owner.id, PaginationParams::new(None, None))
        .await
        .unwrap();
    assert_eq!(entries.pagination.total, 1);
    assert_eq!(entries.items[0].reason.as_deref(), Some("恶意差评"));

    service
        .remove_from_blacklist(restaurant_id, customer.id, owner.id)
        .await
        .unwrap();
    let err = service
        .remove_from_blacklist(restaurant_id, customer.id, owner.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn owner_cannot_blacklist_self() {
    let db = common::setup_db().await;
    let owner = common::seed_owner(&db, "laoban").await;
    let restaurant_id = common::seed_restaurant(&db, owner.id, "小面馆").await;

    let err = CustomerService::new(db.clone())
        .add_to_blacklist(
            restaurant_id,
            owner.id,
            AddBlacklistRequest {
                user_id: owner.id,
                reason: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
}

#[tokio::test]
async fn blacklisted_customer_can_still_order() {
    let db = common::setup_db().await;
    let owner = common::seed_owner(&db, "laoban").await;
    let restaurant_id = common::seed_restaurant(&db, owner.id, "小面馆").await;
    let dish_id = common::seed_dish(&db, restaurant_id, owner.id, "牛肉面", 20.0).await;
    let customer = common::seed_customer(&db, "guke").await;

    let service = CustomerService::new(db.clone());
    service
        .add_to_blacklist(
            restaurant_id,
            owner.id,
            AddBlacklistRequest {
                user_id: customer.id,
                reason: Some("仅标记".to_string()),
            },
        )
        .await
        .unwrap();

    // 黑名单是管理端的参考信息, 下单链路不受影响
    checkout(&db, customer.id, dish_id, 1).await;

    let roster = service
        .list_customers(restaurant_id, owner.id, default_query())
        .await
        .unwrap();
    assert_eq!(roster.items[0].order_count, 1);
    assert!(roster.items[0].is_blacklisted);
}
