use crate::error::AppError;
use crate::utils::JwtService;
use actix_web::http::{Method, header};
use actix_web::{
    Error, HttpMessage,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};

// 无需令牌即可访问的路径: swagger 文档和 /auth 下的注册登录入口,
// 但 /auth 下的个人资料与改密接口仍然要求登录
const OPEN_EXACT: &[&str] = &["/swagger-ui", "/swagger-ui/", "/api-docs/openapi.json"];
const OPEN_PREFIX: &[&str] = &["/swagger-ui/", "/api-docs/", "/api/v1/auth/"];
const GUARDED_UNDER_OPEN: &[&str] = &[
    "/api/v1/auth/profile",
    "/api/v1/auth/change-password",
    "/api/v1/auth/change-username",
];

fn is_open_path(path: &str) -> bool {
    if GUARDED_UNDER_OPEN.iter().any(|g| path.starts_with(g)) {
        return false;
    }
    OPEN_EXACT.contains(&path) || OPEN_PREFIX.iter().any(|p| path.starts_with(p))
}

fn bearer_token(req: &ServiceRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

pub struct AuthMiddleware {
    jwt_service: JwtService,
}

impl AuthMiddleware {
    pub fn new(jwt_service: JwtService) -> Self {
        Self { jwt_service }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            jwt_service: self.jwt_service.clone(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    jwt_service: JwtService,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // CORS 预检没有 Authorization 头, 直接放行
        if req.method() == Method::OPTIONS || is_open_path(req.path()) {
            return Box::pin(self.service.call(req));
        }

        let verified = bearer_token(&req)
            .ok_or_else(|| AppError::AuthError("Missing access token".to_string()))
            .and_then(|token| {
                self.jwt_service
                    .verify_access_token(token)
                    .map_err(|_| AppError::AuthError("Invalid access token".to_string()))
            });

        match verified {
            Ok(claims) => {
                // 用户ID 放进请求扩展, handler 层通过 get_user_id_from_request 取用
                req.extensions_mut()
                    .insert(claims.sub.parse::<i64>().unwrap_or(0));
                Box::pin(self.service.call(req))
            }
            Err(e) => Box::pin(async move { Err(e.into()) }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_paths() {
        assert!(is_open_path("/api/v1/auth/login"));
        assert!(is_open_path("/api/v1/auth/register"));
        assert!(is_open_path("/api-docs/openapi.json"));
        assert!(is_open_path("/swagger-ui/index.html"));
    }

    #[test]
    fn test_guarded_paths() {
        assert!(!is_open_path("/api/v1/auth/profile"));
        assert!(!is_open_path("/api/v1/auth/change-password"));
        assert!(!is_open_path("/api/v1/restaurants"));
        assert!(!is_open_path("/api/v1/cart"));
    }
}
