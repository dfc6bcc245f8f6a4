use crate::handlers::get_user_id_from_request;
use crate::models::*;
use crate::services::ReportService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/restaurants/{restaurant_id}/reports",
    tag = "report",
    security(("bearer_auth" = [])),
    params(("restaurant_id" = i64, Path, description = "餐厅ID")),
    responses(
        (status = 200, description = "全量经营报表", body = ReportResponse),
        (status = 403, description = "无权操作")
    )
)]
pub async fn full_report(
    service: web::Data<ReportService>,
    req: HttpRequest,
    path: web::Path<i64>,
    query: web::Query<ReportQuery>,
) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req).unwrap_or(0);
    match service
        .full_report(path.into_inner(), user_id, query.into_inner())
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn report_config(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/restaurants/{restaurant_id}/reports",
        web::get().to(full_report),
    );
}
