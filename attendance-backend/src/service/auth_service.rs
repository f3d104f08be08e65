// attendance-backend/src/service/auth_service.rs

use crate::domain::role_model::GLOBAL_SCOPE_ROLE;
use crate::domain::user_model::SafeUser;
use crate::error::{AppError, AppResult};
use crate::repository::role_repository::RoleRepository;
use crate::repository::user_repository::UserRepository;
use crate::utils::jwt::JwtManager;
use crate::utils::password::{hash_password, verify_password, PasswordPolicy};
use sea_orm::{ActiveModelBehavior, Set};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// ログイン成功時に発行されるトークンペア
#[derive(Debug, Clone)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// 認証サービス
pub struct AuthService {
    user_repo: Arc<UserRepository>,
    role_repo: Arc<RoleRepository>,
    jwt_manager: Arc<JwtManager>,
    password_policy: PasswordPolicy,
}

impl AuthService {
    pub fn new(
        user_repo: Arc<UserRepository>,
        role_repo: Arc<RoleRepository>,
        jwt_manager: Arc<JwtManager>,
        password_policy: PasswordPolicy,
    ) -> Self {
        Self {
            user_repo,
            role_repo,
            jwt_manager,
            password_policy,
        }
    }

    /// 管理者アカウントの初期作成
    ///
    /// グローバルスコープロールを get-or-create して新規ユーザーに割り当てる。
    pub async fn create_admin(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> AppResult<SafeUser> {
        self.password_policy
            .check(password)
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        if self.user_repo.is_email_taken(email).await? {
            return Err(AppError::Conflict(
                "User with this email already exists".to_string(),
            ));
        }

        let role = self
            .role_repo
            .get_or_create(
                GLOBAL_SCOPE_ROLE,
                "System administrator with full access to all hierarchy data",
            )
            .await?;

        let password_hash = hash_password(password)
            .map_err(|e| AppError::InternalServerError(format!("Password hashing failed: {}", e)))?;

        let mut model = crate::domain::user_model::ActiveModel::new();
        model.email = Set(email.to_string());
        model.password_hash = Set(password_hash);
        model.name = Set(Some(name.to_string()));
        let user = self.user_repo.insert(model).await?;

        self.user_repo.set_roles(user.id, &[role.id]).await?;

        info!(user_id = %user.id, email = %email, "Admin user created");
        Ok(user.to_safe_user(vec![role.name]))
    }

    /// ログイン（メールアドレス + パスワード）
    pub async fn login(&self, email: &str, password: &str) -> AppResult<(AuthTokens, SafeUser)> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

        let password_ok = verify_password(password, &user.password_hash)
            .map_err(|e| AppError::InternalServerError(format!("Password check failed: {}", e)))?;

        if !password_ok {
            warn!(email = %email, "Login attempt with invalid password");
            return Err(AppError::Unauthorized("Invalid credentials".to_string()));
        }

        if !user.can_authenticate() {
            warn!(user_id = %user.id, "Login attempt for inactive account");
            return Err(AppError::Forbidden("Account is disabled".to_string()));
        }

        let role_names = self.user_repo.role_names_of(user.id).await?;
        let claims = user.to_claims(role_names.clone());

        let access_token = self
            .jwt_manager
            .generate_access_token(claims)
            .map_err(|e| AppError::InternalServerError(format!("Token generation failed: {}", e)))?;

        let refresh_token = self
            .jwt_manager
            .generate_refresh_token(user.id)
            .map_err(|e| AppError::InternalServerError(format!("Token generation failed: {}", e)))?;

        info!(user_id = %user.id, "User logged in");
        Ok((
            AuthTokens {
                access_token,
                refresh_token,
            },
            user.to_safe_user(role_names),
        ))
    }

    /// リフレッシュトークンから新しいアクセストークンを発行
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<String> {
        let user_id = self
            .jwt_manager
            .verify_refresh_token(refresh_token)
            .map_err(|_| AppError::Unauthorized("Invalid or expired refresh token".to_string()))?;

        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User no longer exists".to_string()))?;

        if !user.can_authenticate() {
            return Err(AppError::Forbidden("Account is disabled".to_string()));
        }

        let role_names = self.user_repo.role_names_of(user.id).await?;
        let claims = user.to_claims(role_names);

        self.jwt_manager
            .generate_access_token(claims)
            .map_err(|e| AppError::InternalServerError(format!("Token generation failed: {}", e)))
    }

    /// 認証済みユーザー自身の情報を取得
    pub async fn me(&self, user_id: Uuid) -> AppResult<SafeUser> {
        let (user, roles) = self
            .user_repo
            .find_with_roles(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(user.to_safe_user(roles.into_iter().map(|role| role.name).collect()))
    }
}
