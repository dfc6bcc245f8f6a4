use crate::handlers::get_user_id_from_request;
use crate::models::*;
use crate::services::{CartService, OrderService};
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/cart",
    tag = "cart",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "当前购物车", body = CartResponse))
)]
pub async fn get_cart(service: web::Data<CartService>, req: HttpRequest) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req).unwrap_or(0);
    let response = service.get_cart(user_id);
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": response
    })))
}

#[utoipa::path(
    post,
    path = "/cart/items/{dish_id}",
    tag = "cart",
    security(("bearer_auth" = [])),
    params(("dish_id" = i64, Path, description = "菜品ID")),
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "已加入购物车", body = CartResponse),
        (status = 400, description = "菜品已下架")
    )
)]
pub async fn add_item(
    service: web::Data<CartService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<AddToCartRequest>,
) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req).unwrap_or(0);
    match service
        .add_item(user_id, path.into_inner(), request.quantity)
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
    put,
    path = "/cart/items/{dish_id}",
    tag = "cart",
    security(("bearer_auth" = [])),
    params(("dish_id" = i64, Path, description = "菜品ID")),
    request_body = UpdateCartItemRequest,
    responses(
        (status = 200, description = "数量已更新, <=0 视为移除", body = UpdateCartItemResponse),
        (status = 404, description = "购物车中没有该菜品")
    )
)]
pub async fn update_item(
    service: web::Data<CartService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<UpdateCartItemRequest>,
) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req).unwrap_or(0);
    match service.update_item(user_id, path.into_inner(), request.quantity) {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/cart/checkout",
    tag = "cart",
    security(("bearer_auth" = [])),
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "下单成功", body = CheckoutResponse),
        (status = 400, description = "购物车为空或跨餐厅")
    )
)]
pub async fn checkout(
    service: web::Data<OrderService>,
    req: HttpRequest,
    request: web::Json<CheckoutRequest>,
) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req).unwrap_or(0);
    match service.checkout(user_id, request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn cart_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/cart")
            .route("", web::get().to(get_cart))
            .route("/items/{dish_id}", web::post().to(add_item))
            .route("/items/{dish_id}", web::put().to(update_item))
            .route("/checkout", web::post().to(checkout)),
    );
}
