use crate::handlers::get_user_id_from_request;
use crate::models::*;
use crate::services::DishService;
use crate::utils::PaginationParams;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/restaurants/{restaurant_id}/dishes",
    tag = "dish",
    security(("bearer_auth" = [])),
    params(("restaurant_id" = i64, Path, description = "餐厅ID")),
    responses((status = 200, description = "商家菜品列表, 含下架", body = PaginatedDishResponse))
)]
pub async fn list_dishes(
    service: web::Data<DishService>,
    req: HttpRequest,
    path: web::Path<i64>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req).unwrap_or(0);
    match service
        .list_dishes(path.into_inner(), user_id, query.into_inner())
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
    path = "/restaurants/{restaurant_id}/dishes",
    tag = "dish",
    security(("bearer_auth" = [])),
    params(("restaurant_id" = i64, Path, description = "餐厅ID")),
    request_body = CreateDishRequest,
    responses(
        (status = 200, description = "创建成功", body = DishResponse),
        (status = 400, description = "价格必须大于0")
    )
)]
pub async fn create_dish(
    service: web::Data<DishService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<CreateDishRequest>,
) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req).unwrap_or(0);
    match service
        .create_dish(path.into_inner(), user_id, request.into_inner())
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
    path = "/dishes/{dish_id}",
    tag = "dish",
    security(("bearer_auth" = [])),
    params(("dish_id" = i64, Path, description = "菜品ID")),
    responses(
        (status = 200, description = "菜品详情", body = DishResponse),
        (status = 404, description = "菜品不存在")
    )
)]
pub async fn get_dish(
    service: web::Data<DishService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match service.get_dish(path.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/restaurants/{restaurant_id}/dishes/{dish_id}",
    tag = "dish",
    security(("bearer_auth" = [])),
    params(
        ("restaurant_id" = i64, Path, description = "餐厅ID"),
        ("dish_id" = i64, Path, description = "菜品ID")
    ),
    request_body = UpdateDishRequest,
    responses((status = 200, description = "更新成功", body = DishResponse))
)]
pub async fn update_dish(
    service: web::Data<DishService>,
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
    request: web::Json<UpdateDishRequest>,
) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req).unwrap_or(0);
    let (restaurant_id, dish_id) = path.into_inner();
    match service
        .update_dish(restaurant_id, dish_id, user_id, request.into_inner())
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
    path = "/restaurants/{restaurant_id}/dishes/{dish_id}/toggle",
    tag = "dish",
    security(("bearer_auth" = [])),
    params(
        ("restaurant_id" = i64, Path, description = "餐厅ID"),
        ("dish_id" = i64, Path, description = "菜品ID")
    ),
    responses((status = 200, description = "上下架状态已切换", body = DishResponse))
)]
pub async fn toggle_dish(
    service: web::Data<DishService>,
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req).unwrap_or(0);
    let (restaurant_id, dish_id) = path.into_inner();
    match service.toggle_dish(restaurant_id, dish_id, user_id).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/restaurants/{restaurant_id}/dishes/{dish_id}",
    tag = "dish",
    security(("bearer_auth" = [])),
    params(
        ("restaurant_id" = i64, Path, description = "餐厅ID"),
        ("dish_id" = i64, Path, description = "菜品ID")
    ),
    responses(
        (status = 200, description = "删除成功"),
        (status = 400, description = "菜品已有历史订单")
    )
)]
pub async fn delete_dish(
    service: web::Data<DishService>,
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req).unwrap_or(0);
    let (restaurant_id, dish_id) = path.into_inner();
    match service.delete_dish(restaurant_id, dish_id, user_id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "菜品已删除"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn dish_config(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/restaurants/{restaurant_id}/dishes",
        web::get().to(list_dishes),
    )
    .route(
        "/restaurants/{restaurant_id}/dishes",
        web::post().to(create_dish),
    )
    .route(
        "/restaurants/{restaurant_id}/dishes/{dish_id}",
        web::put().to(update_dish),
    )
    .route(
        "/restaurants/{restaurant_id}/dishes/{dish_id}",
        web::delete().to(delete_dish),
    )
    .route(
        "/restaurants/{restaurant_id}/dishes/{dish_id}/toggle",
        web::post().to(toggle_dish),
    )
    .route("/dishes/{dish_id}", web::get().to(get_dish));
}
