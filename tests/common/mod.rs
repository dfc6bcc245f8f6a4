#![allow(dead_code)]

use chrono::Utc;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};

use diancan_backend::entities::users::{self, UserRole};
use diancan_backend::models::{CreateDishRequest, CreateRestaurantRequest};
use diancan_backend::services::{DishService, RestaurantService};

/// 每个测试独立的内存数据库, 跑全量迁移
pub async fn setup_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

pub async fn seed_user(db: &DatabaseConnection, username: &str, role: UserRole) -> users::Model {
    users::ActiveModel {
        username: Set(username.to_string()),
        email: Set(format!("{username}@example.com")),
        // 走服务层登录的测试自己注册, 这里不需要真实哈希
        password_hash: Set("$2b$12$fakefakefakefakefakefake".to_string()),
        role: Set(role),
        is_active: Set(true),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn seed_owner(db: &DatabaseConnection, username: &str) -> users::Model {
    seed_user(db, username, UserRole::Owner).await
}

pub async fn seed_customer(db: &DatabaseConnection, username: &str) -> users::Model {
    seed_user(db, username, UserRole::Customer).await
}

/// 通过服务层建餐厅, 连默认分类一起初始化
pub async fn seed_restaurant(db: &DatabaseConnection, owner_id: i64, name: &str) -> i64 {
    let service = RestaurantService::new(db.clone());
    let restaurant = service
        .create_restaurant(
            owner_id,
            CreateRestaurantRequest {
                name: name.to_string(),
                description: None,
            },
        )
        .await
        .unwrap();
    restaurant.id
}

/// 在餐厅的第一个分类下建一道菜, 返回菜品ID
pub async fn seed_dish(
    db: &DatabaseConnection,
    restaurant_id: i64,
    owner_id: i64,
    name: &str,
    price: f64,
) -> i64 {
    let service = DishService::new(db.clone());
    let category = service
        .list_categories(restaurant_id)
        .await
        .unwrap()
        .into_iter()
        .next()
        .unwrap();
    let dish = service
        .create_dish(
            restaurant_id,
            owner_id,
            CreateDishRequest {
                name: name.to_string(),
                description: None,
                price,
                category_id: category.id,
            },
        )
        .await
        .unwrap();
    dish.id
}
