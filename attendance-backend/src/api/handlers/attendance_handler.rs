// attendance-backend/src/api/handlers/attendance_handler.rs

use crate::api::dto::attendance_dto::{MonitorSummaryResponse, RemindQuery, SubmitAttendanceRequest};
use crate::api::dto::common::{ApiResponse, Created};
use crate::api::AppState;
use crate::domain::attendance_model::Model as Attendance;
use crate::domain::hierarchy::HierarchyKind;
use crate::domain::role_model::GLOBAL_SCOPE_ROLE;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthenticatedUser;
use crate::service::reminder_service::ReminderSummary;
use axum::{
    extract::{Json, Path, Query, State},
    routing::{get, post},
    Router,
};
use chrono::{Datelike, Utc};
use tracing::info;
use validator::Validate;

/// 現在のISO週番号
fn current_week() -> i32 {
    Utc::now().iso_week().week() as i32
}

/// entity_type パスパラメータを解釈する（無効な値は 400）
fn parse_kind(entity_type: &str) -> AppResult<HierarchyKind> {
    entity_type
        .parse::<HierarchyKind>()
        .map_err(AppError::BadRequest)
}

/// 出席提出
pub async fn submit_attendance_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<SubmitAttendanceRequest>,
) -> AppResult<Created<Attendance>> {
    payload.validate()?;
    let kind = parse_kind(&payload.entity_type)?;

    let record = app_state
        .attendance_service
        .submit(user.scope(), kind, payload.entity_id, payload.week)
        .await?;

    Ok(Created(record))
}

/// 提出状況ダッシュボード
pub async fn attendance_monitor_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<ApiResponse<MonitorSummaryResponse>> {
    user.require_any_role(&[GLOBAL_SCOPE_ROLE, "State Admin"])?;

    let summary = app_state
        .attendance_service
        .monitor_summary(current_week())
        .await?;

    Ok(ApiResponse::success(summary))
}

/// 一斉リマインド
pub async fn remind_broad_handler(
    State(app_state): State<AppState>,
    Path(entity_type): Path<String>,
    Query(query): Query<RemindQuery>,
    user: AuthenticatedUser,
) -> AppResult<ApiResponse<ReminderSummary>> {
    user.require_global_scope()?;
    let kind = parse_kind(&entity_type)?;
    let channels = query.requested_channels().map_err(AppError::BadRequest)?;

    info!(
        admin_id = %user.user_id(),
        entity_kind = %kind,
        "Broad reminder triggered"
    );

    let summary = app_state
        .reminder_service
        .remind_broad(kind, &channels, current_week())
        .await?;

    Ok(ApiResponse::success(summary))
}

/// 対象リマインド
pub async fn remind_targeted_handler(
    State(app_state): State<AppState>,
    Path((entity_type, entity_id)): Path<(String, i32)>,
    Query(query): Query<RemindQuery>,
    user: AuthenticatedUser,
) -> AppResult<ApiResponse<ReminderSummary>> {
    user.require_global_scope()?;
    let kind = parse_kind(&entity_type)?;
    let channels = query.requested_channels().map_err(AppError::BadRequest)?;

    info!(
        admin_id = %user.user_id(),
        entity_kind = %kind,
        entity_id = %entity_id,
        "Targeted reminder triggered"
    );

    let summary = app_state
        .reminder_service
        .remind_targeted(kind, entity_id, &channels, current_week())
        .await?;

    Ok(ApiResponse::success(summary))
}

pub fn attendance_router() -> Router<AppState> {
    Router::new()
        .route("/attendance", post(submit_attendance_handler))
        .route("/monitor/attendance", get(attendance_monitor_handler))
        .route("/monitor/remind/{entity_type}", post(remind_broad_handler))
        .route(
            "/monitor/remind/{entity_type}/{entity_id}",
            post(remind_targeted_handler),
        )
}
