use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CustomerQuery {
    /// total_spent | order_count | last_order
    pub sort_by: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CustomerSummary {
    pub user_id: i64,
    pub username: String,
    pub order_count: i64,
    pub total_spent: f64,
    pub last_order_at: Option<DateTime<Utc>>,
    pub is_blacklisted: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FavoriteDish {
    pub dish_id: i64,
    pub dish_name: String,
    pub total_quantity: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CustomerDetailResponse {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub order_count: i64,
    pub total_spent: f64,
    pub first_order_at: Option<DateTime<Utc>>,
    pub last_order_at: Option<DateTime<Utc>>,
    pub favorite_dishes: Vec<FavoriteDish>,
    pub is_blacklisted: bool,
    pub blacklist_reason: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AddBlacklistRequest {
    pub user_id: i64,
    pub reason: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BlacklistEntryResponse {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}
