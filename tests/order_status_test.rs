//! 订单状态流转: 显式状态机, 终态不可再变, 计数器不随状态回滚

mod common;

use std::time::Duration;

use sea_orm::EntityTrait;

use diancan_backend::AppError;
use diancan_backend::entities::orders::OrderStatus;
use diancan_backend::entities::{dishes, restaurants};
use diancan_backend::models::{CheckoutRequest, UpdateOrderStatusRequest};
use diancan_backend::services::{CartService, CartStore, ContextCache, OrderService};

async fn checkout_one(
    db: &sea_orm::DatabaseConnection,
    customer_id: i64,
    dish_id: i64,
) -> (OrderService, i64) {
    let store = CartStore::new();
    let cart = CartService::new(db.clone(), store.clone());
    let orders_service =
        OrderService::new(db.clone(), store, ContextCache::new(Duration::from_secs(60)));
    cart.add_item(customer_id, dish_id, Some(1)).await.unwrap();
    let receipt = orders_service
        .checkout(customer_id, CheckoutRequest { remarks: None })
        .await
        .unwrap();
    (orders_service, receipt.order_id)
}

#[tokio::test]
async fn paid_order_can_complete() {
    let db = common::setup_db().await;
    let owner = common::seed_owner(&db, "laoban").await;
    let restaurant_id = common::seed_restaurant(&db, owner.id, "小面馆").await;
    let dish_id = common::seed_dish(&db, restaurant_id, owner.id, "牛肉面", 20.0).await;
    let customer = common::seed_customer(&db, "guke").await;

    let (service, order_id) = checkout_one(&db, customer.id, dish_id).await;
    let updated = service
        .update_status(
            restaurant_id,
            order_id,
            owner.id,
            UpdateOrderStatusRequest { status: OrderStatus::Completed },
        )
        .await
        .unwrap();
    assert_eq!(updated.status, OrderStatus::Completed);
}

#[tokio::test]
async fn completed_order_is_terminal() {
    let db = common::setup_db().await;
    let owner = common::seed_owner(&db, "laoban").await;
    let restaurant_id = common::seed_restaurant(&db, owner.id, "小面馆").await;
    let dish_id = common::seed_dish(&db, restaurant_id, owner.id, "牛肉面", 20.0).await;
    let customer = common::seed_customer(&db, "guke").await;

    let (service, order_id) = checkout_one(&db, customer.id, dish_id).await;
    service
        .update_status(
            restaurant_id,
            order_id,
            owner.id,
            UpdateOrderStatusRequest { status: OrderStatus::Completed },
        )
        .await
        .unwrap();

    for next in [
        OrderStatus::Pending,
        OrderStatus::Paid,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ] {
        let err = service
            .update_status(
                restaurant_id,
                order_id,
                owner.id,
                UpdateOrderStatusRequest { status: next },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition { .. }));
    }

    // 销量在结算时入账一次, 完成和被拒绝的重复完成都不再累加
    let dish = dishes::Entity::find_by_id(dish_id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(dish.order_count, 1);
}

#[tokio::test]
async fn cancelling_paid_order_keeps_counters() {
    let db = common::setup_db().await;
    let owner = common::seed_owner(&db, "laoban").await;
    let restaurant_id = common::seed_restaurant(&db, owner.id, "小面馆").await;
    let dish_id = common::seed_dish(&db, restaurant_id, owner.id, "牛肉面", 20.0).await;
    let customer = common::seed_customer(&db, "guke").await;

    let (service, order_id) = checkout_one(&db, customer.id, dish_id).await;
    service
        .update_status(
            restaurant_id,
            order_id,
            owner.id,
            UpdateOrderStatusRequest { status: OrderStatus::Cancelled },
        )
        .await
        .unwrap();

    // 累计销售额是结算时一次性入账的, 取消不回滚
    let restaurant = restaurants::Entity::find_by_id(restaurant_id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(restaurant.total_sales, 20.0);
}

#[tokio::test]
async fn only_owner_may_update_status() {
    let db = common::setup_db().await;
    let owner = common::seed_owner(&db, "laoban").await;
    let other_owner = common::seed_owner(&db, "waidiren").await;
    let restaurant_id = common::seed_restaurant(&db, owner.id, "小面馆").await;
    let dish_id = common::seed_dish(&db, restaurant_id, owner.id, "牛肉面", 20.0).await;
    let customer = common::seed_customer(&db, "guke").await;

    let (service, order_id) = checkout_one(&db, customer.id, dish_id).await;
    let err = service
        .update_status(
            restaurant_id,
            order_id,
            other_owner.id,
            UpdateOrderStatusRequest { status: OrderStatus::Completed },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}
