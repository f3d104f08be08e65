// attendance-backend/src/api/handlers/import_handler.rs

use crate::api::dto::common::ApiResponse;
use crate::api::dto::import_dto::{
    HierarchyImportRequest, HierarchyImportSummary, ImportStatesRequest, StateImportSummary,
};
use crate::api::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use axum::{
    extract::{Json, State},
    routing::post,
    Router,
};
use tracing::info;
use validator::Validate;

/// 州の行単位インポート
///
/// 行単位でエラーを隔離する。行の検証はサービス側。
pub async fn import_states_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<ImportStatesRequest>,
) -> AppResult<ApiResponse<StateImportSummary>> {
    user.require_global_scope()?;

    info!(
        admin_id = %user.user_id(),
        rows = %payload.rows.len(),
        "State import started"
    );

    let summary = app_state.import_service.import_states(payload.rows).await?;
    Ok(ApiResponse::success(summary))
}

/// 階層ドキュメントの一括インポート（全体で1トランザクション）
pub async fn import_hierarchy_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<HierarchyImportRequest>,
) -> AppResult<ApiResponse<HierarchyImportSummary>> {
    user.require_global_scope()?;
    payload.validate()?;

    info!(
        admin_id = %user.user_id(),
        state = %payload.state.name,
        districts = %payload.districts.len(),
        "Hierarchy import started"
    );

    let summary = app_state.import_service.import_hierarchy(payload).await?;
    Ok(ApiResponse::success(summary))
}

pub fn import_router() -> Router<AppState> {
    Router::new()
        .route("/import/states", post(import_states_handler))
        .route("/import/hierarchy", post(import_hierarchy_handler))
}
