// attendance-backend/src/api/mod.rs

use crate::middleware::auth::jwt_auth_middleware;
use crate::service::attendance_service::AttendanceService;
use crate::service::auth_service::AuthService;
use crate::service::hierarchy_service::HierarchyService;
use crate::service::import_service::ImportService;
use crate::service::reminder_service::ReminderService;
use crate::service::user_service::UserService;
use crate::utils::jwt::JwtManager;
use axum::{routing::get, Json, Router};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod dto;
pub mod handlers;

use handlers::attendance_handler::attendance_router;
use handlers::auth_handler::{auth_protected_router, auth_public_router};
use handlers::hierarchy_handler::hierarchy_router;
use handlers::import_handler::import_router;
use handlers::user_handler::user_router;

/// 統一されたアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub user_service: Arc<UserService>,
    pub hierarchy_service: Arc<HierarchyService>,
    pub attendance_service: Arc<AttendanceService>,
    pub reminder_service: Arc<ReminderService>,
    pub import_service: Arc<ImportService>,
    pub jwt_manager: Arc<JwtManager>,
}

/// 簡易ヘルスチェック
async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// アプリケーション全体のルーターを構築する
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .merge(auth_protected_router())
        .merge(hierarchy_router())
        .merge(user_router())
        .merge(attendance_router())
        .merge(import_router())
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_handler))
        .merge(auth_public_router())
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
