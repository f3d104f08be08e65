// attendance-backend/src/api/handlers/auth_handler.rs

use crate::api::dto::auth_dto::{
    CreateAdminRequest, LoginRequest, LoginResponse, RefreshTokenRequest, RefreshTokenResponse,
};
use crate::api::dto::common::{ApiResponse, Created};
use crate::api::AppState;
use crate::domain::user_model::SafeUser;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use axum::{
    extract::{Json, State},
    routing::{get, post},
    Router,
};
use tracing::info;
use validator::Validate;

/// 管理者初期作成
pub async fn create_admin_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateAdminRequest>,
) -> AppResult<Created<SafeUser>> {
    payload.validate()?;

    let user = app_state
        .auth_service
        .create_admin(&payload.email, &payload.password, &payload.name)
        .await?;

    Ok(Created(user))
}

/// ログイン
pub async fn login_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<ApiResponse<LoginResponse>> {
    payload.validate()?;

    let (tokens, user) = app_state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;

    Ok(ApiResponse::success(LoginResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        user,
    }))
}

/// アクセストークン更新
pub async fn refresh_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<RefreshTokenRequest>,
) -> AppResult<ApiResponse<RefreshTokenResponse>> {
    payload.validate()?;

    let access_token = app_state.auth_service.refresh(&payload.refresh_token).await?;

    Ok(ApiResponse::success(RefreshTokenResponse { access_token }))
}

/// 認証済みユーザー自身の情報
pub async fn me_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<ApiResponse<SafeUser>> {
    info!(user_id = %user.user_id(), "Fetching current user");

    let safe_user = app_state.auth_service.me(user.user_id()).await?;
    Ok(ApiResponse::success(safe_user))
}

/// 認証不要のルート
pub fn auth_public_router() -> Router<AppState> {
    Router::new()
        .route("/auth/create-admin", post(create_admin_handler))
        .route("/auth/login", post(login_handler))
        .route("/auth/refresh", post(refresh_handler))
}

/// 認証必須のルート
pub fn auth_protected_router() -> Router<AppState> {
    Router::new().route("/auth/me", get(me_handler))
}
