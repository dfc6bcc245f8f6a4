use crate::entities::restaurants;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateRestaurantRequest {
    #[schema(example = "小面馆")]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateRestaurantRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RestaurantResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: i64,
    pub total_sales: f64,
    pub created_at: DateTime<Utc>,
}

/// 店铺经营概览
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardResponse {
    pub restaurant: RestaurantResponse,
    pub total_sales: f64,
    pub total_orders: i64,
    pub pending_orders: i64,
    pub paid_orders: i64,
    pub dish_count: i64,
    pub customer_count: i64,
}

impl From<restaurants::Model> for RestaurantResponse {
    fn from(r: restaurants::Model) -> Self {
        Self {
            id: r.id,
            name: r.name,
            description: r.description,
            owner_id: r.owner_id,
            total_sales: r.total_sales,
            created_at: r.created_at,
        }
    }
}
