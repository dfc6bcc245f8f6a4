use crate::entities::{OrderStatus, order_items, orders};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderQuery {
    pub status: Option<OrderStatus>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub id: i64,
    pub user_id: i64,
    pub restaurant_id: i64,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    /// 北京时间展示字段, 仅用于前端显示
    pub local_created_at: String,
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderItemResponse {
    pub id: i64,
    pub dish_id: i64,
    pub dish_name: String,
    pub quantity: i64,
    pub price_at_time: f64,
    pub subtotal: f64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderDetailResponse {
    #[serde(flatten)]
    pub order: OrderResponse,
    pub customer_name: String,
    pub items: Vec<OrderItemResponse>,
}

/// 各状态订单数量, 商家订单列表侧栏用
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct StatusCounts {
    pub pending: i64,
    pub paid: i64,
    pub completed: i64,
    pub cancelled: i64,
}

impl From<orders::Model> for OrderResponse {
    fn from(o: orders::Model) -> Self {
        let local = (o.created_at + Duration::hours(8))
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();
        Self {
            id: o.id,
            user_id: o.user_id,
            restaurant_id: o.restaurant_id,
            total_amount: o.total_amount,
            status: o.status,
            remarks: o.remarks,
            created_at: o.created_at,
            local_created_at: local,
            paid_at: o.paid_at,
        }
    }
}

impl OrderItemResponse {
    pub fn from_item(item: order_items::Model, dish_name: String) -> Self {
        let subtotal = item.price_at_time * item.quantity as f64;
        Self {
            id: item.id,
            dish_id: item.dish_id,
            dish_name,
            quantity: item.quantity,
            price_at_time: item.price_at_time,
            subtotal,
        }
    }
}
