use crate::handlers::get_user_id_from_request;
use crate::models::*;
use crate::services::{DishService, RestaurantService};
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/restaurants",
    tag = "restaurant",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "餐厅列表, 按累计销售额倒序", body = Vec<RestaurantResponse>))
)]
pub async fn list_restaurants(service: web::Data<RestaurantService>) -> Result<HttpResponse> {
    match service.list_restaurants().await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/restaurants",
    tag = "restaurant",
    security(("bearer_auth" = [])),
    request_body = CreateRestaurantRequest,
    responses(
        (status = 200, description = "创建成功", body = RestaurantResponse),
        (status = 400, description = "名称重复或已有餐厅"),
        (status = 403, description = "非商家账号")
    )
)]
pub async fn create_restaurant(
    service: web::Data<RestaurantService>,
    req: HttpRequest,
    request: web::Json<CreateRestaurantRequest>,
) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req).unwrap_or(0);
    match service
        .create_restaurant(user_id, request.into_inner())
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
    path = "/restaurants/mine",
    tag = "restaurant",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "我的餐厅", body = RestaurantResponse),
        (status = 404, description = "尚未创建餐厅")
    )
)]
pub async fn my_restaurant(
    service: web::Data<RestaurantService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req).unwrap_or(0);
    match service.get_my_restaurant(user_id).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/restaurants/{restaurant_id}",
    tag = "restaurant",
    security(("bearer_auth" = [])),
    params(("restaurant_id" = i64, Path, description = "餐厅ID")),
    responses(
        (status = 200, description = "餐厅详情", body = RestaurantResponse),
        (status = 404, description = "餐厅不存在")
    )
)]
pub async fn get_restaurant(
    service: web::Data<RestaurantService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match service.get_restaurant(path.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/restaurants/{restaurant_id}",
    tag = "restaurant",
    security(("bearer_auth" = [])),
    params(("restaurant_id" = i64, Path, description = "餐厅ID")),
    request_body = UpdateRestaurantRequest,
    responses(
        (status = 200, description = "更新成功", body = RestaurantResponse),
        (status = 403, description = "无权操作")
    )
)]
pub async fn update_restaurant(
    service: web::Data<RestaurantService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<UpdateRestaurantRequest>,
) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req).unwrap_or(0);
    match service
        .update_restaurant(path.into_inner(), user_id, request.into_inner())
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
    path = "/restaurants/{restaurant_id}/menu",
    tag = "restaurant",
    security(("bearer_auth" = [])),
    params(("restaurant_id" = i64, Path, description = "餐厅ID")),
    responses((status = 200, description = "按分类分组的菜单", body = Vec<MenuCategory>))
)]
pub async fn get_menu(
    service: web::Data<DishService>,
    path: web::Path<i64>,
    query: web::Query<MenuQuery>,
) -> Result<HttpResponse> {
    match service
        .get_menu(path.into_inner(), query.category_id)
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
    path = "/restaurants/{restaurant_id}/dashboard",
    tag = "restaurant",
    security(("bearer_auth" = [])),
    params(("restaurant_id" = i64, Path, description = "餐厅ID")),
    responses(
        (status = 200, description = "经营概览", body = DashboardResponse),
        (status = 403, description = "无权操作")
    )
)]
pub async fn get_dashboard(
    service: web::Data<RestaurantService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req).unwrap_or(0);
    match service.get_dashboard(path.into_inner(), user_id).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

// 餐厅下还挂着分类/菜品/订单等子资源, 这里不用 scope 以免吞掉子路径
pub fn restaurant_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/restaurants", web::get().to(list_restaurants))
        .route("/restaurants", web::post().to(create_restaurant))
        .route("/restaurants/mine", web::get().to(my_restaurant))
        .route("/restaurants/{restaurant_id}", web::get().to(get_restaurant))
        .route(
            "/restaurants/{restaurant_id}",
            web::put().to(update_restaurant),
        )
        .route("/restaurants/{restaurant_id}/menu", web::get().to(get_menu))
        .route(
            "/restaurants/{restaurant_id}/dashboard",
            web::get().to(get_dashboard),
        );
}
