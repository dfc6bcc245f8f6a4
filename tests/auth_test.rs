//! 注册/登录/令牌刷新与账号修改

mod common;

use diancan_backend::AppError;
use diancan_backend::entities::users::UserRole;
use diancan_backend::models::{
    ChangePasswordRequest, ChangeUsernameRequest, LoginRequest, RegisterRequest,
};
use diancan_backend::services::AuthService;
use diancan_backend::utils::JwtService;

fn auth_service(db: &sea_orm::DatabaseConnection) -> AuthService {
    AuthService::new(db.clone(), JwtService::new("test-secret", 3600, 86400), 3600)
}

fn register_request(username: &str, role: Option<UserRole>) -> RegisterRequest {
    RegisterRequest {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password: "abc123".to_string(),
        role,
    }
}

#[tokio::test]
async fn register_then_login_by_email() {
    let db = common::setup_db().await;
    let service = auth_service(&db);

    let registered = service.register(register_request("zhangsan", None)).await.unwrap();
    assert_eq!(registered.user.role, UserRole::Customer);
    assert!(!registered.access_token.is_empty());

    let logged_in = service
        .login(LoginRequest {
            email: "zhangsan@example.com".to_string(),
            password: "abc123".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(logged_in.user.id, registered.user.id);
}

#[tokio::test]
async fn duplicate_email_rejected() {
    let db = common::setup_db().await;
    let service = auth_service(&db);
    service.register(register_request("zhangsan", None)).await.unwrap();

    let mut req = register_request("lisi", None);
    req.email = "zhangsan@example.com".to_string();
    let err = service.register(req).await.unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
}

#[tokio::test]
async fn wrong_password_rejected() {
    let db = common::setup_db().await;
    let service = auth_service(&db);
    service.register(register_request("zhangsan", None)).await.unwrap();

    let err = service
        .login(LoginRequest {
            email: "zhangsan@example.com".to_string(),
            password: "wrong1".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AuthError(_)));
}

#[tokio::test]
async fn short_password_rejected() {
    let db = common::setup_db().await;
    let service = auth_service(&db);

    let mut req = register_request("zhangsan", None);
    req.password = "abc".to_string();
    let err = service.register(req).await.unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
}

#[tokio::test]
async fn refresh_token_issues_new_access_token() {
    let db = common::setup_db().await;
    let service = auth_service(&db);
    let registered = service
        .register(register_request("zhangsan", Some(UserRole::Owner)))
        .await
        .unwrap();

    let refreshed = service.refresh_token(&registered.refresh_token).await.unwrap();
    assert!(!refreshed.access_token.is_empty());

    // access token 不能当 refresh token 用
    let err = service.refresh_token(&registered.access_token).await.unwrap_err();
    assert!(matches!(err, AppError::AuthError(_)));
}

#[tokio::test]
async fn change_password_requires_old_password() {
    let db = common::setup_db().await;
    let service = auth_service(&db);
    let registered = service.register(register_request("zhangsan", None)).await.unwrap();

    let err = service
        .change_password(
            registered.user.id,
            ChangePasswordRequest {
                old_password: "wrong1".to_string(),
                new_password: "xyz789".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AuthError(_)));

    service
        .change_password(
            registered.user.id,
            ChangePasswordRequest {
                old_password: "abc123".to_string(),
                new_password: "xyz789".to_string(),
            },
        )
        .await
        .unwrap();

    service
        .login(LoginRequest {
            email: "zhangsan@example.com".to_string(),
            password: "xyz789".to_string(),
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn change_username_requires_password_check() {
    let db = common::setup_db().await;
    let service = auth_service(&db);
    let registered = service.register(register_request("zhangsan", None)).await.unwrap();

    let err = service
        .change_username(
            registered.user.id,
            ChangeUsernameRequest {
                new_username: "wangwu".to_string(),
                password: "wrong1".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AuthError(_)));

    let updated = service
        .change_username(
            registered.user.id,
            ChangeUsernameRequest {
                new_username: "wangwu".to_string(),
                password: "abc123".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.username, "wangwu");
}
