use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 购物车中的一行, 加入时的价格快照
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CartLine {
    pub dish_id: i64,
    pub dish_name: String,
    pub price: f64,
    pub quantity: i64,
    pub restaurant_id: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    #[schema(example = 1)]
    pub quantity: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateCartItemRequest {
    pub quantity: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CartResponse {
    pub items: Vec<CartLine>,
    pub total_price: f64,
    pub cart_count: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateCartItemResponse {
    pub removed: bool,
    pub total_price: f64,
    pub cart_count: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    pub remarks: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CheckoutResponse {
    pub order_id: i64,
    pub total_amount: f64,
    pub message: String,
}
