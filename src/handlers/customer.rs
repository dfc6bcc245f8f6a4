use crate::handlers::get_user_id_from_request;
use crate::models::*;
use crate::services::CustomerService;
use crate::utils::PaginationParams;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/restaurants/{restaurant_id}/customers",
    tag = "customer",
    security(("bearer_auth" = [])),
    params(("restaurant_id" = i64, Path, description = "餐厅ID")),
    responses((status = 200, description = "客户花名册"))
)]
pub async fn list_customers(
    service: web::Data<CustomerService>,
    req: HttpRequest,
    path: web::Path<i64>,
    query: web::Query<CustomerQuery>,
) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req).unwrap_or(0);
    match service
        .list_customers(path.into_inner(), user_id, query.into_inner())
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
    path = "/restaurants/{restaurant_id}/customers/{customer_id}",
    tag = "customer",
    security(("bearer_auth" = [])),
    params(
        ("restaurant_id" = i64, Path, description = "餐厅ID"),
        ("customer_id" = i64, Path, description = "顾客ID")
    ),
    responses((status = 200, description = "顾客消费画像", body = CustomerDetailResponse))
)]
pub async fn get_customer_detail(
    service: web::Data<CustomerService>,
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req).unwrap_or(0);
    let (restaurant_id, customer_id) = path.into_inner();
    match service
        .get_customer_detail(restaurant_id, customer_id, user_id)
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
    path = "/restaurants/{restaurant_id}/blacklist",
    tag = "customer",
    security(("bearer_auth" = [])),
    params(("restaurant_id" = i64, Path, description = "餐厅ID")),
    responses((status = 200, description = "黑名单列表"))
)]
pub async fn list_blacklist(
    service: web::Data<CustomerService>,
    req: HttpRequest,
    path: web::Path<i64>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req).unwrap_or(0);
    match service
        .list_blacklist(path.into_inner(), user_id, query.into_inner())
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
    post,
    path = "/restaurants/{restaurant_id}/blacklist",
    tag = "customer",
    security(("bearer_auth" = [])),
    params(("restaurant_id" = i64, Path, description = "餐厅ID")),
    request_body = AddBlacklistRequest,
    responses(
        (status = 200, description = "已加入黑名单", body = BlacklistEntryResponse),
        (status = 400, description = "该用户已在黑名单中")
    )
)]
pub async fn add_to_blacklist(
    service: web::Data<CustomerService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<AddBlacklistRequest>,
) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req).unwrap_or(0);
    match service
        .add_to_blacklist(path.into_inner(), user_id, request.into_inner())
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
    delete,
    path = "/restaurants/{restaurant_id}/blacklist/{user_id}",
    tag = "customer",
    security(("bearer_auth" = [])),
    params(
        ("restaurant_id" = i64, Path, description = "餐厅ID"),
        ("user_id" = i64, Path, description = "要移出黑名单的用户ID")
    ),
    responses(
        (status = 200, description = "已移出黑名单"),
        (status = 404, description = "该用户不在黑名单中")
    )
)]
pub async fn remove_from_blacklist(
    service: web::Data<CustomerService>,
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req).unwrap_or(0);
    let (restaurant_id, target_user_id) = path.into_inner();
    match service
        .remove_from_blacklist(restaurant_id, target_user_id, user_id)
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "已移出黑名单"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn customer_config(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/restaurants/{restaurant_id}/customers",
        web::get().to(list_customers),
    )
    .route(
        "/restaurants/{restaurant_id}/customers/{customer_id}",
        web::get().to(get_customer_detail),
    )
    .route(
        "/restaurants/{restaurant_id}/blacklist",
        web::get().to(list_blacklist),
    )
    .route(
        "/restaurants/{restaurant_id}/blacklist",
        web::post().to(add_to_blacklist),
    )
    .route(
        "/restaurants/{restaurant_id}/blacklist/{user_id}",
        web::delete().to(remove_from_blacklist),
    );
}
