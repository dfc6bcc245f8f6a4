use crate::entities::{categories, dishes};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateCategoryRequest {
    #[schema(example = "凉菜")]
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateCategoryRequest {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponse {
    pub id: i64,
    pub restaurant_id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateDishRequest {
    #[schema(example = "红烧牛肉面")]
    pub name: String,
    pub description: Option<String>,
    #[schema(example = 20.0)]
    pub price: f64,
    pub category_id: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateDishRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category_id: Option<i64>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DishResponse {
    pub id: i64,
    pub restaurant_id: i64,
    pub category_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub is_active: bool,
    pub order_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MenuQuery {
    pub category_id: Option<i64>,
}

/// 按分类分组的菜单
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MenuCategory {
    pub category: CategoryResponse,
    pub dishes: Vec<DishResponse>,
}

impl From<categories::Model> for CategoryResponse {
    fn from(c: categories::Model) -> Self {
        Self {
            id: c.id,
            restaurant_id: c.restaurant_id,
            name: c.name,
            created_at: c.created_at,
        }
    }
}

impl From<dishes::Model> for DishResponse {
    fn from(d: dishes::Model) -> Self {
        Self {
            id: d.id,
            restaurant_id: d.restaurant_id,
            category_id: d.category_id,
            name: d.name,
            description: d.description,
            price: d.price,
            is_active: d.is_active,
            order_count: d.order_count,
            created_at: d.created_at,
        }
    }
}
