//! 餐厅/分类/菜品管理的业务约束

mod common;

use std::time::Duration;

use diancan_backend::AppError;
use diancan_backend::models::{
    CheckoutRequest, CreateCategoryRequest, CreateDishRequest, CreateRestaurantRequest,
};
use diancan_backend::services::{
    CartService, CartStore, ContextCache, DishService, OrderService, RestaurantService,
};

#[tokio::test]
async fn new_restaurant_gets_default_categories() {
    let db = common::setup_db().await;
    let owner = common::seed_owner(&db, "laoban").await;
    let restaurant_id = common::seed_restaurant(&db, owner.id, "小面馆").await;

    let categories = DishService::new(db.clone())
        .list_categories(restaurant_id)
        .await
        .unwrap();
    let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["饮品", "菜品", "主食", "其他"]);
}

#[tokio::test]
async fn one_restaurant_per_owner() {
    let db = common::setup_db().await;
    let owner = common::seed_owner(&db, "laoban").await;
    common::seed_restaurant(&db, owner.id, "小面馆").await;

    let err = RestaurantService::new(db.clone())
        .create_restaurant(
            owner.id,
            CreateRestaurantRequest {
                name: "第二家店".to_string(),
                description: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
}

#[tokio::test]
async fn customers_cannot_create_restaurants() {
    let db = common::setup_db().await;
    let customer = common::seed_customer(&db, "guke").await;

    let err = RestaurantService::new(db.clone())
        .create_restaurant(
            customer.id,
            CreateRestaurantRequest {
                name: "黑店".to_string(),
                description: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[tokio::test]
async fn duplicate_category_name_rejected() {
    let db = common::setup_db().await;
    let owner = common::seed_owner(&db, "laoban").await;
    let restaurant_id = common::seed_restaurant(&db, owner.id, "小面馆").await;

    let err = DishService::new(db.clone())
        .create_category(
            restaurant_id,
            owner.id,
            CreateCategoryRequest { name: "饮品".to_string() },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
}

#[tokio::test]
async fn name_limits_count_characters_not_bytes() {
    let db = common::setup_db().await;
    let owner = common::seed_owner(&db, "laoban").await;
    let restaurant_id = common::seed_restaurant(&db, owner.id, "小面馆").await;

    let service = DishService::new(db.clone());

    // 23 个汉字 69 字节, 按字符数仍在 50 以内
    let long_cjk = "本店招牌秘制红烧牛肉面系列特辣加麻加辣豪华大碗".to_string();
    assert_eq!(long_cjk.chars().count(), 23);
    assert!(long_cjk.len() > 50);
    let created = service
        .create_category(
            restaurant_id,
            owner.id,
            CreateCategoryRequest { name: long_cjk.clone() },
        )
        .await
        .unwrap();
    assert_eq!(created.name, long_cjk);

    // 超过 50 个字符才算超长
    let too_long: String = "面".repeat(51);
    let err = service
        .create_category(
            restaurant_id,
            owner.id,
            CreateCategoryRequest { name: too_long },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
}

#[tokio::test]
async fn category_with_dishes_cannot_be_deleted() {
    let db = common::setup_db().await;
    let owner = common::seed_owner(&db, "laoban").await;
    let restaurant_id = common::seed_restaurant(&db, owner.id, "小面馆").await;
    common::seed_dish(&db, restaurant_id, owner.id, "牛肉面", 20.0).await;

    let service = DishService::new(db.clone());
    let category = service.list_categories(restaurant_id).await.unwrap()[0].id;
    let err = service
        .delete_category(restaurant_id, category, owner.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
}

#[tokio::test]
async fn dish_price_must_be_positive() {
    let db = common::setup_db().await;
    let owner = common::seed_owner(&db, "laoban").await;
    let restaurant_id = common::seed_restaurant(&db, owner.id, "小面馆").await;

    let service = DishService::new(db.clone());
    let category = service.list_categories(restaurant_id).await.unwrap()[0].id;
    let err = service
        .create_dish(
            restaurant_id,
            owner.id,
            CreateDishRequest {
                name: "免费菜".to_string(),
                description: None,
                price: 0.0,
                category_id: category,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
}

#[tokio::test]
async fn dish_with_order_history_cannot_be_deleted() {
    let db = common::setup_db().await;
    let owner = common::seed_owner(&db, "laoban").await;
    let restaurant_id = common::seed_restaurant(&db, owner.id, "小面馆").await;
    let dish_id = common::seed_dish(&db, restaurant_id, owner.id, "牛肉面", 20.0).await;
    let customer = common::seed_customer(&db, "guke").await;

    let store = CartStore::new();
    let cart = CartService::new(db.clone(), store.clone());
    let orders_service =
        OrderService::new(db.clone(), store, ContextCache::new(Duration::from_secs(60)));
    cart.add_item(customer.id, dish_id, None).await.unwrap();
    orders_service
        .checkout(customer.id, CheckoutRequest { remarks: None })
        .await
        .unwrap();

    let err = DishService::new(db.clone())
        .delete_dish(restaurant_id, dish_id, owner.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
}

#[tokio::test]
async fn menu_hides_inactive_dishes() {
    let db = common::setup_db().await;
    let owner = common::seed_owner(&db, "laoban").await;
    let restaurant_id = common::seed_restaurant(&db, owner.id, "小面馆").await;
    let dish_id = common::seed_dish(&db, restaurant_id, owner.id, "牛肉面", 20.0).await;

    let service = DishService::new(db.clone());
    service.toggle_dish(restaurant_id, dish_id, owner.id).await.unwrap();

    let menu = service.get_menu(restaurant_id, None).await.unwrap();
    let dish_count: usize = menu.iter().map(|c| c.dishes.len()).sum();
    assert_eq!(dish_count, 0);

    // 再切回上架, 菜单可见
    service.toggle_dish(restaurant_id, dish_id, owner.id).await.unwrap();
    let menu = service.get_menu(restaurant_id, None).await.unwrap();
    let dish_count: usize = menu.iter().map(|c| c.dishes.len()).sum();
    assert_eq!(dish_count, 1);
}
