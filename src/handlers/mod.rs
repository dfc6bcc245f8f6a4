pub mod advisor;
pub mod auth;
pub mod cart;
pub mod category;
pub mod customer;
pub mod dish;
pub mod order;
pub mod report;
pub mod restaurant;

pub use advisor::advisor_config;
pub use auth::auth_config;
pub use cart::cart_config;
pub use category::category_config;
pub use customer::customer_config;
pub use dish::dish_config;
pub use order::order_config;
pub use report::report_config;
pub use restaurant::restaurant_config;

use actix_web::{HttpMessage, HttpRequest};

/// 认证中间件把用户 id 写进请求扩展, 这里取回
pub(crate) fn get_user_id_from_request(req: &HttpRequest) -> Option<i64> {
    req.extensions().get::<i64>().copied()
}
