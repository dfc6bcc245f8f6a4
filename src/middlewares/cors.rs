use actix_cors::Cors;

// 前端域名在部署时才确定, 这里对所有来源放行并允许携带凭据;
// 生产环境应换成固定的域名白名单
pub fn create_cors() -> Cors {
    Cors::default()
        .allowed_origin_fn(|_origin, _req_head| true)
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allow_any_header()
        .supports_credentials()
        .max_age(3600)
}
