use crate::handlers::get_user_id_from_request;
use crate::models::*;
use crate::services::AdvisorService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/restaurants/{restaurant_id}/advisor",
    tag = "advisor",
    security(("bearer_auth" = [])),
    params(("restaurant_id" = i64, Path, description = "餐厅ID")),
    request_body = AdvisorRequest,
    responses(
        (status = 200, description = "顾问回答", body = AdvisorResponse),
        (status = 403, description = "无权操作")
    )
)]
pub async fn ask_advisor(
    service: web::Data<AdvisorService>,
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<AdvisorRequest>,
) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req).unwrap_or(0);
    match service
        .ask(path.into_inner(), user_id, body.into_inner())
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
    path = "/dishes/{dish_id}/ask",
    tag = "advisor",
    security(("bearer_auth" = [])),
    params(("dish_id" = i64, Path, description = "菜品ID")),
    request_body = DishAskRequest,
    responses(
        (status = 200, description = "菜品问答回答", body = AdvisorResponse),
        (status = 404, description = "菜品不存在")
    )
)]
pub async fn ask_dish(
    service: web::Data<AdvisorService>,
    path: web::Path<i64>,
    body: web::Json<DishAskRequest>,
) -> Result<HttpResponse> {
    match service.ask_dish(path.into_inner(), body.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn advisor_config(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/restaurants/{restaurant_id}/advisor",
        web::post().to(ask_advisor),
    )
    .route("/dishes/{dish_id}/ask", web::post().to(ask_dish));
}
