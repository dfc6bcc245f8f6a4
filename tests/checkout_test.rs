//! 购物车结算的事务语义: 金额快照, 计数器自增, 清车

mod common;

use std::time::Duration;

use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, PaginatorTrait, Set};

use diancan_backend::AppError;
use diancan_backend::entities::{dishes, order_items, orders, restaurants};
use diancan_backend::entities::orders::OrderStatus;
use diancan_backend::models::CheckoutRequest;
use diancan_backend::services::{CartService, CartStore, ContextCache, OrderService};

fn build_services(db: &sea_orm::DatabaseConnection) -> (CartService, OrderService) {
    let store = CartStore::new();
    let cache = ContextCache::new(Duration::from_secs(60));
    (
        CartService::new(db.clone(), store.clone()),
        OrderService::new(db.clone(), store, cache),
    )
}

#[tokio::test]
async fn checkout_records_totals_and_increments_counters() {
    let db = common::setup_db().await;
    let owner = common::seed_owner(&db, "laoban").await;
    let restaurant_id = common::seed_restaurant(&db, owner.id, "小面馆").await;
    let dish_id = common::seed_dish(&db, restaurant_id, owner.id, "红烧牛肉面", 20.0).await;
    let customer = common::seed_customer(&db, "guke").await;

    let (cart, orders_service) = build_services(&db);
    cart.add_item(customer.id, dish_id, Some(2)).await.unwrap();

    let receipt = orders_service
        .checkout(customer.id, CheckoutRequest { remarks: Some("少辣".to_string()) })
        .await
        .unwrap();
    assert_eq!(receipt.total_amount, 40.0);

    let order = orders::Entity::find_by_id(receipt.order_id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.status, OrderStatus::Paid);
    assert!(order.paid_at.is_some());
    assert_eq!(order.remarks.as_deref(), Some("少辣"));

    let dish = dishes::Entity::find_by_id(dish_id).one(&db).await.unwrap().unwrap();
    assert_eq!(dish.order_count, 2);

    let restaurant = restaurants::Entity::find_by_id(restaurant_id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(restaurant.total_sales, 40.0);

    // 结算后购物车清空
    assert!(cart.get_cart(customer.id).items.is_empty());
}

#[tokio::test]
async fn checkout_keeps_cart_snapshot_price() {
    let db = common::setup_db().await;
    let owner = common::seed_owner(&db, "laoban").await;
    let restaurant_id = common::seed_restaurant(&db, owner.id, "小面馆").await;
    let dish_id = common::seed_dish(&db, restaurant_id, owner.id, "酸辣粉", 10.0).await;
    let customer = common::seed_customer(&db, "guke").await;

    let (cart, orders_service) = build_services(&db);
    cart.add_item(customer.id, dish_id, Some(1)).await.unwrap();

    // 加购后涨价, 订单仍按加购时的价格结算
    let mut dish = dishes::Entity::find_by_id(dish_id)
        .one(&db)
        .await
        .unwrap()
        .unwrap()
        .into_active_model();
    dish.price = Set(99.0);
    dish.update(&db).await.unwrap();

    let receipt = orders_service
        .checkout(customer.id, CheckoutRequest { remarks: None })
        .await
        .unwrap();
    assert_eq!(receipt.total_amount, 10.0);

    let item = order_items::Entity::find()
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(item.price_at_time, 10.0);
}

#[tokio::test]
async fn checkout_rejects_empty_cart() {
    let db = common::setup_db().await;
    let customer = common::seed_customer(&db, "guke").await;
    let (_, orders_service) = build_services(&db);

    let err = orders_service
        .checkout(customer.id, CheckoutRequest { remarks: None })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
}

#[tokio::test]
async fn checkout_rejects_mixed_restaurants_and_writes_nothing() {
    let db = common::setup_db().await;
    let owner_a = common::seed_owner(&db, "laoban_a").await;
    let owner_b = common::seed_owner(&db, "laoban_b").await;
    let restaurant_a = common::seed_restaurant(&db, owner_a.id, "面馆").await;
    let restaurant_b = common::seed_restaurant(&db, owner_b.id, "粉店").await;
    let dish_a = common::seed_dish(&db, restaurant_a, owner_a.id, "牛肉面", 20.0).await;
    let dish_b = common::seed_dish(&db, restaurant_b, owner_b.id, "螺蛳粉", 15.0).await;
    let customer = common::seed_customer(&db, "guke").await;

    let (cart, orders_service) = build_services(&db);
    cart.add_item(customer.id, dish_a, None).await.unwrap();
    cart.add_item(customer.id, dish_b, None).await.unwrap();

    let err = orders_service
        .checkout(customer.id, CheckoutRequest { remarks: None })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));

    // 整单拒绝: 没有落任何订单, 购物车原样保留
    assert_eq!(orders::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(cart.get_cart(customer.id).items.len(), 2);
}

#[tokio::test]
async fn add_item_rejects_inactive_dish() {
    let db = common::setup_db().await;
    let owner = common::seed_owner(&db, "laoban").await;
    let restaurant_id = common::seed_restaurant(&db, owner.id, "小面馆").await;
    let dish_id = common::seed_dish(&db, restaurant_id, owner.id, "下架菜", 12.0).await;

    let mut dish = dishes::Entity::find_by_id(dish_id)
        .one(&db)
        .await
        .unwrap()
        .unwrap()
        .into_active_model();
    dish.is_active = Set(false);
    dish.update(&db).await.unwrap();

    let customer = common::seed_customer(&db, "guke").await;
    let (cart, _) = build_services(&db);
    let err = cart.add_item(customer.id, dish_id, None).await.unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
}
