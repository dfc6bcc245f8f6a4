use crate::handlers::get_user_id_from_request;
use crate::models::*;
use crate::services::OrderService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/orders",
    tag = "order",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "我的订单列表, 按下单时间倒序"))
)]
pub async fn list_my_orders(
    service: web::Data<OrderService>,
    req: HttpRequest,
    query: web::Query<OrderQuery>,
) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req).unwrap_or(0);
    match service
        .list_customer_orders(user_id, query.into_inner())
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/orders/{order_id}",
    tag = "order",
    security(("bearer_auth" = [])),
    params(("order_id" = i64, Path, description = "订单ID")),
    responses(
        (status = 200, description = "订单明细", body = OrderDetailResponse),
        (status = 404, description = "订单不存在")
    )
)]
pub async fn get_order_detail(
    service: web::Data<OrderService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req).unwrap_or(0);
    match service.get_order_detail(path.into_inner(), user_id).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/restaurants/{restaurant_id}/orders",
    tag = "order",
    security(("bearer_auth" = [])),
    params(("restaurant_id" = i64, Path, description = "餐厅ID")),
    responses((status = 200, description = "餐厅订单列表 + 各状态数量"))
)]
pub async fn list_restaurant_orders(
    service: web::Data<OrderService>,
    req: HttpRequest,
    path: web::Path<i64>,
    query: web::Query<OrderQuery>,
) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req).unwrap_or(0);
    match service
        .list_restaurant_orders(path.into_inner(), user_id, query.into_inner())
        .await
    {
        Ok((orders, status_counts)) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": {
                "orders": orders,
                "status_counts": status_counts
            }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/restaurants/{restaurant_id}/orders/{order_id}/status",
    tag = "order",
    security(("bearer_auth" = [])),
    params(
        ("restaurant_id" = i64, Path, description = "餐厅ID"),
        ("order_id" = i64, Path, description = "订单ID")
    ),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "状态已更新", body = OrderResponse),
        (status = 400, description = "不允许的状态迁移")
    )
)]
pub async fn update_order_status(
    service: web::Data<OrderService>,
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
    request: web::Json<UpdateOrderStatusRequest>,
) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req).unwrap_or(0);
    let (restaurant_id, order_id) = path.into_inner();
    match service
        .update_status(restaurant_id, order_id, user_id, request.into_inner())
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn order_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/orders", web::get().to(list_my_orders))
        .route("/orders/{order_id}", web::get().to(get_order_detail))
        .route(
            "/restaurants/{restaurant_id}/orders",
            web::get().to(list_restaurant_orders),
        )
        .route(
            "/restaurants/{restaurant_id}/orders/{order_id}/status",
            web::put().to(update_order_status),
        );
}
