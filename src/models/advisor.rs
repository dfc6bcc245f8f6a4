use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdvisorRequest {
    #[schema(example = "最近哪些菜卖得最好?")]
    pub question: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdvisorResponse {
    pub answer: String,
    /// false 表示走了本地规则降级
    pub used_ai: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DishAskRequest {
    #[schema(example = "这道菜辣不辣?")]
    pub question: String,
}
