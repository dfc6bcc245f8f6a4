//! 报表统计口径: 只计 paid 订单, 逐日销售补零, 分类占比

mod common;

use std::time::Duration;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, Set};

use diancan_backend::entities::orders::OrderStatus;
use diancan_backend::entities::{order_items, orders};
use diancan_backend::models::{CheckoutRequest, Period, ReportQuery};
use diancan_backend::services::{CartService, CartStore, ContextCache, OrderService, ReportService};

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

/// 直接落一笔非 paid 订单, 报表不应统计它
async fn insert_order_with_status(
    db: &sea_orm::DatabaseConnection,
    customer_id: i64,
    restaurant_id: i64,
    dish_id: i64,
    amount: f64,
    status: OrderStatus,
) {
    let order = orders::ActiveModel {
        user_id: Set(customer_id),
        restaurant_id: Set(restaurant_id),
        total_amount: Set(amount),
        status: Set(status),
        remarks: Set(None),
        created_at: Set(Utc::now()),
        paid_at: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();
    order_items::ActiveModel {
        order_id: Set(order.id),
        dish_id: Set(dish_id),
        quantity: Set(1),
        price_at_time: Set(amount),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();
}

#[tokio::test]
async fn reports_count_paid_orders_only() {
    let db = common::setup_db().await;
    let owner = common::seed_owner(&db, "laoban").await;
    let restaurant_id = common::seed_restaurant(&db, owner.id, "小面馆").await;
    let dish_id = common::seed_dish(&db, restaurant_id, owner.id, "牛肉面", 20.0).await;
    let customer = common::seed_customer(&db, "guke").await;

    checkout(&db, customer.id, dish_id, 1).await;
    insert_order_with_status(&db, customer.id, restaurant_id, dish_id, 1000.0, OrderStatus::Cancelled)
        .await;
    insert_order_with_status(&db, customer.id, restaurant_id, dish_id, 500.0, OrderStatus::Pending)
        .await;

    let reports = ReportService::new(db.clone());
    let summary = reports.sales_summary(restaurant_id, Period::All).await.unwrap();
    assert_eq!(summary.order_count, 1);
    assert_eq!(summary.total_sales, 20.0);
    assert_eq!(summary.average_order_amount, 20.0);

    // 取消/待支付订单的明细也不进热销榜
    let top = reports.top_dishes(restaurant_id, Period::All, 10).await.unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].total_quantity, 1);
    assert_eq!(top[0].total_revenue, 20.0);
}

#[tokio::test]
async fn daily_sales_zero_fills_missing_days() {
    let db = common::setup_db().await;
    let owner = common::seed_owner(&db, "laoban").await;
    let restaurant_id = common::seed_restaurant(&db, owner.id, "小面馆").await;
    let dish_id = common::seed_dish(&db, restaurant_id, owner.id, "牛肉面", 20.0).await;
    let customer = common::seed_customer(&db, "guke").await;

    checkout(&db, customer.id, dish_id, 2).await;

    let reports = ReportService::new(db.clone());
    let daily = reports.daily_sales(restaurant_id, 3).await.unwrap();
    assert_eq!(daily.len(), 3);
    // 日期升序, 只有今天有成交
    assert!(daily[0].date < daily[1].date && daily[1].date < daily[2].date);
    assert_eq!(daily[0].total, 0.0);
    assert_eq!(daily[1].total, 0.0);
    assert_eq!(daily[2].total, 40.0);
    assert_eq!(daily[2].order_count, 1);
}

#[tokio::test]
async fn category_sales_percentages_cover_revenue_split() {
    let db = common::setup_db().await;
    let owner = common::seed_owner(&db, "laoban").await;
    let restaurant_id = common::seed_restaurant(&db, owner.id, "小面馆").await;
    let customer = common::seed_customer(&db, "guke").await;

    // 两个默认分类各放一道菜
    let dish_service = diancan_backend::services::DishService::new(db.clone());
    let categories = dish_service.list_categories(restaurant_id).await.unwrap();
    let dish_a = dish_service
        .create_dish(
            restaurant_id,
            owner.id,
            diancan_backend::models::CreateDishRequest {
                name: "可乐".to_string(),
                description: None,
                price: 30.0,
                category_id: categories[0].id,
            },
        )
        .await
        .unwrap();
    let dish_b = dish_service
        .create_dish(
            restaurant_id,
            owner.id,
            diancan_backend::models::CreateDishRequest {
                name: "牛肉面".to_string(),
                description: None,
                price: 10.0,
                category_id: categories[1].id,
            },
        )
        .await
        .unwrap();

    checkout(&db, customer.id, dish_a.id, 1).await;
    checkout(&db, customer.id, dish_b.id, 1).await;

    let reports = ReportService::new(db.clone());
    let categories = reports.category_sales(restaurant_id, Period::All).await.unwrap();
    assert_eq!(categories.len(), 2);
    // 营收降序
    assert_eq!(categories[0].total_revenue, 30.0);
    assert_eq!(categories[0].percentage, 75.0);
    assert_eq!(categories[1].total_revenue, 10.0);
    assert_eq!(categories[1].percentage, 25.0);
}

#[tokio::test]
async fn full_report_requires_ownership() {
    let db = common::setup_db().await;
    let owner = common::seed_owner(&db, "laoban").await;
    let intruder = common::seed_owner(&db, "waidiren").await;
    let restaurant_id = common::seed_restaurant(&db, owner.id, "小面馆").await;

    let reports = ReportService::new(db.clone());
    let err = reports
        .full_report(restaurant_id, intruder.id, ReportQuery { period: None, top_n: None, days: None })
        .await
        .unwrap_err();
    assert!(matches!(err, diancan_backend::AppError::Forbidden(_)));

    // 老板本人拿空报表也不报错
    let report = reports
        .full_report(restaurant_id, owner.id, ReportQuery { period: None, top_n: None, days: None })
        .await
        .unwrap();
    assert_eq!(report.summary.order_count, 0);
    assert!(report.top_dishes.is_empty());
}
