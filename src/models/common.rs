use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 统一错误载荷, 对应错误响应体里的 `error` 字段
/// (成功响应由各 handler 直接拼 `{"success": true, "data": ...}`)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}
