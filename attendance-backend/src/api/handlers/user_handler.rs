// attendance-backend/src/api/handlers/user_handler.rs

use crate::api::dto::common::{ApiResponse, Created, MessageResponse};
use crate::api::dto::user_dto::{CreateUserRequest, UpdateUserRequest};
use crate::api::AppState;
use crate::domain::user_model::SafeUser;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use axum::{
    extract::{Json, Path, State},
    routing::get,
    Router,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

/// ユーザー一覧取得（スコープ制限付き）
pub async fn list_users_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<ApiResponse<Vec<SafeUser>>> {
    let users = app_state.user_service.list_users(user.scope()).await?;

    info!(
        admin_id = %user.user_id(),
        users_count = %users.len(),
        "Users list retrieved"
    );
    Ok(ApiResponse::success(users))
}

/// ユーザー取得
pub async fn get_user_handler(
    State(app_state): State<AppState>,
    Path(user_id): Path<Uuid>,
    _user: AuthenticatedUser,
) -> AppResult<ApiResponse<SafeUser>> {
    let safe_user = app_state.user_service.get_user(user_id).await?;
    Ok(ApiResponse::success(safe_user))
}

/// ユーザー作成（階層ロールの昇格ガード付き）
pub async fn create_user_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateUserRequest>,
) -> AppResult<Created<SafeUser>> {
    payload.validate()?;

    let created = app_state
        .user_service
        .create_user(&user.claims, payload)
        .await?;

    Ok(Created(created))
}

/// ユーザー部分更新
pub async fn update_user_handler(
    State(app_state): State<AppState>,
    Path(user_id): Path<Uuid>,
    user: AuthenticatedUser,
    Json(payload): Json<UpdateUserRequest>,
) -> AppResult<ApiResponse<SafeUser>> {
    payload.validate()?;

    let updated = app_state
        .user_service
        .update_user(&user.claims, user_id, payload)
        .await?;

    Ok(ApiResponse::success(updated))
}

/// ユーザー削除
pub async fn delete_user_handler(
    State(app_state): State<AppState>,
    Path(user_id): Path<Uuid>,
    user: AuthenticatedUser,
) -> AppResult<ApiResponse<MessageResponse>> {
    let email = app_state
        .user_service
        .delete_user(&user.claims, user_id)
        .await?;

    Ok(ApiResponse::success(MessageResponse::new(format!(
        "User {} deleted successfully",
        email
    ))))
}

pub fn user_router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users_handler).post(create_user_handler))
        .route(
            "/users/{user_id}",
            get(get_user_handler)
                .patch(update_user_handler)
                .delete(delete_user_handler),
        )
}
