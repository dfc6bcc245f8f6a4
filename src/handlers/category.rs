use crate::handlers::get_user_id_from_request;
use crate::models::*;
use crate::services::DishService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/restaurants/{restaurant_id}/categories",
    tag = "category",
    security(("bearer_auth" = [])),
    params(("restaurant_id" = i64, Path, description = "餐厅ID")),
    responses((status = 200, description = "分类列表", body = Vec<CategoryResponse>))
)]
pub async fn list_categories(
    service: web::Data<DishService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match service.list_categories(path.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/restaurants/{restaurant_id}/categories",
    tag = "category",
    security(("bearer_auth" = [])),
    params(("restaurant_id" = i64, Path, description = "餐厅ID")),
    request_body = CreateCategoryRequest,
    responses(
        (status = 200, description = "创建成功", body = CategoryResponse),
        (status = 400, description = "分类名称已存在")
    )
)]
pub async fn create_category(
    service: web::Data<DishService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<CreateCategoryRequest>,
) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req).unwrap_or(0);
    match service
        .create_category(path.into_inner(), user_id, request.into_inner())
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
    path = "/restaurants/{restaurant_id}/categories/{category_id}",
    tag = "category",
    security(("bearer_auth" = [])),
    params(
        ("restaurant_id" = i64, Path, description = "餐厅ID"),
        ("category_id" = i64, Path, description = "分类ID")
    ),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "重命名成功", body = CategoryResponse),
        (status = 400, description = "分类名称已存在")
    )
)]
pub async fn update_category(
    service: web::Data<DishService>,
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
    request: web::Json<UpdateCategoryRequest>,
) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req).unwrap_or(0);
    let (restaurant_id, category_id) = path.into_inner();
    match service
        .update_category(restaurant_id, category_id, user_id, request.into_inner())
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
    path = "/restaurants/{restaurant_id}/categories/{category_id}",
    tag = "category",
    security(("bearer_auth" = [])),
    params(
        ("restaurant_id" = i64, Path, description = "餐厅ID"),
        ("category_id" = i64, Path, description = "分类ID")
    ),
    responses(
        (status = 200, description = "删除成功"),
        (status = 400, description = "分类下还有菜品")
    )
)]
pub async fn delete_category(
    service: web::Data<DishService>,
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req).unwrap_or(0);
    let (restaurant_id, category_id) = path.into_inner();
    match service
        .delete_category(restaurant_id, category_id, user_id)
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "分类已删除"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn category_config(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/restaurants/{restaurant_id}/categories",
        web::get().to(list_categories),
    )
    .route(
        "/restaurants/{restaurant_id}/categories",
        web::post().to(create_category),
    )
    .route(
        "/restaurants/{restaurant_id}/categories/{category_id}",
        web::put().to(update_category),
    )
    .route(
        "/restaurants/{restaurant_id}/categories/{category_id}",
        web::delete().to(delete_category),
    );
}
