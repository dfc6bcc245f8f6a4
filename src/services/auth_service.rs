use crate::entities::{UserRole, users};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::{JwtService, hash_password, validate_password, verify_password};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set,
};

#[derive(Clone)]
pub struct AuthService {
    pool: DatabaseConnection,
    jwt_service: JwtService,
    access_expires_in: i64,
}

impl AuthService {
    pub fn new(pool: DatabaseConnection, jwt_service: JwtService, access_expires_in: i64) -> Self {
        Self {
            pool,
            jwt_service,
            access_expires_in,
        }
    }

    pub async fn register(&self, req: RegisterRequest) -> AppResult<AuthResponse> {
        let username = req.username.trim().to_string();
        let email = req.email.trim().to_lowercase();

        if username.is_empty() || username.chars().count() > 50 {
            return Err(AppError::ValidationError(
                "用户名长度必须在1-50字符之间".to_string(),
            ));
        }
        if !email.contains('@') {
            return Err(AppError::ValidationError("邮箱格式不正确".to_string()));
        }
        validate_password(&req.password)?;

        if users::Entity::find()
            .filter(users::Column::Username.eq(username.clone()))
            .one(&self.pool)
            .await?
            .is_some()
        {
            return Err(AppError::ValidationError("用户名已被注册".to_string()));
        }
        if users::Entity::find()
            .filter(users::Column::Email.eq(email.clone()))
            .one(&self.pool)
            .await?
            .is_some()
        {
            return Err(AppError::ValidationError("邮箱已被注册".to_string()));
        }

        let role = req.role.unwrap_or(UserRole::Customer);
        let user = users::ActiveModel {
            username: Set(username),
            email: Set(email),
            password_hash: Set(hash_password(&req.password)?),
            role: Set(role),
            is_active: Set(true),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        self.build_auth_response(user)
    }

    pub async fn login(&self, req: LoginRequest) -> AppResult<AuthResponse> {
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(req.email.trim().to_lowercase()))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::AuthError("邮箱或密码错误".to_string()))?;

        if !verify_password(&req.password, &user.password_hash)? {
            return Err(AppError::AuthError("邮箱或密码错误".to_string()));
        }
        if !user.is_active {
            return Err(AppError::AuthError("账号已被禁用".to_string()));
        }

        self.build_auth_response(user)
    }

    pub async fn refresh_token(&self, refresh_token: &str) -> AppResult<RefreshResponse> {
        let claims = self.jwt_service.verify_refresh_token(refresh_token)?;
        let user_id: i64 = claims
            .sub
            .parse()
            .map_err(|_| AppError::AuthError("无效的令牌".to_string()))?;

        let user = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::AuthError("用户不存在".to_string()))?;
        if !user.is_active {
            return Err(AppError::AuthError("账号已被禁用".to_string()));
        }

        let access_token = self.jwt_service.generate_access_token(user.id, &user.role)?;
        Ok(RefreshResponse {
            access_token,
            expires_in: self.access_expires_in,
        })
    }

    pub async fn get_profile(&self, user_id: i64) -> AppResult<UserResponse> {
        let user = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("用户不存在".to_string()))?;
        Ok(UserResponse::from(user))
    }

    pub async fn change_password(&self, user_id: i64, req: ChangePasswordRequest) -> AppResult<()> {
        let user = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("用户不存在".to_string()))?;

        if !verify_password(&req.old_password, &user.password_hash)? {
            return Err(AppError::AuthError("原密码错误".to_string()));
        }
        validate_password(&req.new_password)?;

        let mut am = user.into_active_model();
        am.password_hash = Set(hash_password(&req.new_password)?);
        am.update(&self.pool).await?;
        Ok(())
    }

    pub async fn change_username(
        &self,
        user_id: i64,
        req: ChangeUsernameRequest,
    ) -> AppResult<UserResponse> {
        let new_username = req.new_username.trim().to_string();
        if new_username.is_empty() || new_username.chars().count() > 50 {
            return Err(AppError::ValidationError(
                "用户名长度必须在1-50字符之间".to_string(),
            ));
        }

        if let Some(existing) = users::Entity::find()
            .filter(users::Column::Username.eq(new_username.clone()))
            .one(&self.pool)
            .await?
            && existing.id != user_id
        {
            return Err(AppError::ValidationError("用户名已被注册".to_string()));
        }

        let user = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("用户不存在".to_string()))?;
        if !verify_password(&req.password, &user.password_hash)? {
            return Err(AppError::AuthError("密码错误".to_string()));
        }

        let mut am = user.into_active_model();
        am.username = Set(new_username);
        let updated = am.update(&self.pool).await?;
        Ok(UserResponse::from(updated))
    }

    fn build_auth_response(&self, user: users::Model) -> AppResult<AuthResponse> {
        let access_token = self.jwt_service.generate_access_token(user.id, &user.role)?;
        let refresh_token = self
            .jwt_service
            .generate_refresh_token(user.id, &user.role)?;

        Ok(AuthResponse {
            user: UserResponse::from(user),
            access_token,
            refresh_token,
            expires_in: self.access_expires_in,
        })
    }
}
