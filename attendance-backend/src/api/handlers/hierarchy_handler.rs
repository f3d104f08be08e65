// attendance-backend/src/api/handlers/hierarchy_handler.rs

use crate::api::dto::common::{ApiResponse, Created, MessageResponse};
use crate::api::dto::hierarchy_dto::{
    CreateDistrictRequest, CreateGroupRequest, CreateOldGroupRequest, CreateRegionRequest,
    CreateStateRequest, UpdateNodeRequest,
};
use crate::api::AppState;
use crate::domain::{district_model, group_model, old_group_model, region_model, state_model};
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use axum::{
    extract::{Json, Path, State},
    routing::get,
    Router,
};
use validator::Validate;

// --- States ---

pub async fn list_states_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<ApiResponse<Vec<state_model::Model>>> {
    let states = app_state
        .hierarchy_service
        .list::<state_model::Entity>(user.scope())
        .await?;
    Ok(ApiResponse::success(states))
}

pub async fn get_state_handler(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    user: AuthenticatedUser,
) -> AppResult<ApiResponse<state_model::Model>> {
    let state = app_state
        .hierarchy_service
        .get::<state_model::Entity>(user.scope(), id)
        .await?;
    Ok(ApiResponse::success(state))
}

pub async fn create_state_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateStateRequest>,
) -> AppResult<Created<state_model::Model>> {
    payload.validate()?;

    let state = app_state
        .hierarchy_service
        .create_state(user.scope(), payload)
        .await?;
    Ok(Created(state))
}

pub async fn update_state_handler(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    user: AuthenticatedUser,
    Json(payload): Json<UpdateNodeRequest>,
) -> AppResult<ApiResponse<state_model::Model>> {
    payload.validate()?;

    let state = app_state
        .hierarchy_service
        .update_node::<state_model::Entity, state_model::ActiveModel>(user.scope(), id, payload)
        .await?;
    Ok(ApiResponse::success(state))
}

pub async fn delete_state_handler(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    user: AuthenticatedUser,
) -> AppResult<ApiResponse<MessageResponse>> {
    app_state
        .hierarchy_service
        .delete_node::<state_model::Entity>(user.scope(), id)
        .await?;
    Ok(ApiResponse::success(MessageResponse::new(
        "State deleted successfully",
    )))
}

// --- Regions ---

pub async fn list_regions_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<ApiResponse<Vec<region_model::Model>>> {
    let regions = app_state
        .hierarchy_service
        .list::<region_model::Entity>(user.scope())
        .await?;
    Ok(ApiResponse::success(regions))
}

pub async fn get_region_handler(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    user: AuthenticatedUser,
) -> AppResult<ApiResponse<region_model::Model>> {
    let region = app_state
        .hierarchy_service
        .get::<region_model::Entity>(user.scope(), id)
        .await?;
    Ok(ApiResponse::success(region))
}

pub async fn create_region_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateRegionRequest>,
) -> AppResult<Created<region_model::Model>> {
    payload.validate()?;

    let region = app_state
        .hierarchy_service
        .create_region(user.scope(), payload)
        .await?;
    Ok(Created(region))
}

pub async fn update_region_handler(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    user: AuthenticatedUser,
    Json(payload): Json<UpdateNodeRequest>,
) -> AppResult<ApiResponse<region_model::Model>> {
    payload.validate()?;

    let region = app_state
        .hierarchy_service
        .update_node::<region_model::Entity, region_model::ActiveModel>(user.scope(), id, payload)
        .await?;
    Ok(ApiResponse::success(region))
}

pub async fn delete_region_handler(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    user: AuthenticatedUser,
) -> AppResult<ApiResponse<MessageResponse>> {
    app_state
        .hierarchy_service
        .delete_node::<region_model::Entity>(user.scope(), id)
        .await?;
    Ok(ApiResponse::success(MessageResponse::new(
        "Region deleted successfully",
    )))
}

// --- Districts ---

pub async fn list_districts_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<ApiResponse<Vec<district_model::Model>>> {
    let districts = app_state
        .hierarchy_service
        .list::<district_model::Entity>(user.scope())
        .await?;
    Ok(ApiResponse::success(districts))
}

pub async fn get_district_handler(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    user: AuthenticatedUser,
) -> AppResult<ApiResponse<district_model::Model>> {
    let district = app_state
        .hierarchy_service
        .get::<district_model::Entity>(user.scope(), id)
        .await?;
    Ok(ApiResponse::success(district))
}

pub async fn create_district_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateDistrictRequest>,
) -> AppResult<Created<district_model::Model>> {
    payload.validate()?;

    let district = app_state
        .hierarchy_service
        .create_district(user.scope(), payload)
        .await?;
    Ok(Created(district))
}

pub async fn update_district_handler(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    user: AuthenticatedUser,
    Json(payload): Json<UpdateNodeRequest>,
) -> AppResult<ApiResponse<district_model::Model>> {
    payload.validate()?;

    let district = app_state
        .hierarchy_service
        .update_node::<district_model::Entity, district_model::ActiveModel>(
            user.scope(),
            id,
            payload,
        )
        .await?;
    Ok(ApiResponse::success(district))
}

pub async fn delete_district_handler(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    user: AuthenticatedUser,
) -> AppResult<ApiResponse<MessageResponse>> {
    app_state
        .hierarchy_service
        .delete_node::<district_model::Entity>(user.scope(), id)
        .await?;
    Ok(ApiResponse::success(MessageResponse::new(
        "District deleted successfully",
    )))
}

// --- Groups ---

pub async fn list_groups_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<ApiResponse<Vec<group_model::Model>>> {
    let groups = app_state
        .hierarchy_service
        .list::<group_model::Entity>(user.scope())
        .await?;
    Ok(ApiResponse::success(groups))
}

pub async fn get_group_handler(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    user: AuthenticatedUser,
) -> AppResult<ApiResponse<group_model::Model>> {
    let group = app_state
        .hierarchy_service
        .get::<group_model::Entity>(user.scope(), id)
        .await?;
    Ok(ApiResponse::success(group))
}

pub async fn create_group_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateGroupRequest>,
) -> AppResult<Created<group_model::Model>> {
    payload.validate()?;

    let group = app_state
        .hierarchy_service
        .create_group(user.scope(), payload)
        .await?;
    Ok(Created(group))
}

pub async fn update_group_handler(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    user: AuthenticatedUser,
    Json(payload): Json<UpdateNodeRequest>,
) -> AppResult<ApiResponse<group_model::Model>> {
    payload.validate()?;

    let group = app_state
        .hierarchy_service
        .update_node::<group_model::Entity, group_model::ActiveModel>(user.scope(), id, payload)
        .await?;
    Ok(ApiResponse::success(group))
}

pub async fn delete_group_handler(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    user: AuthenticatedUser,
) -> AppResult<ApiResponse<MessageResponse>> {
    app_state
        .hierarchy_service
        .delete_node::<group_model::Entity>(user.scope(), id)
        .await?;
    Ok(ApiResponse::success(MessageResponse::new(
        "Group deleted successfully",
    )))
}

// --- Old groups ---

pub async fn list_old_groups_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<ApiResponse<Vec<old_group_model::Model>>> {
    let old_groups = app_state
        .hierarchy_service
        .list::<old_group_model::Entity>(user.scope())
        .await?;
    Ok(ApiResponse::success(old_groups))
}

pub async fn get_old_group_handler(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    user: AuthenticatedUser,
) -> AppResult<ApiResponse<old_group_model::Model>> {
    let old_group = app_state
        .hierarchy_service
        .get::<old_group_model::Entity>(user.scope(), id)
        .await?;
    Ok(ApiResponse::success(old_group))
}

pub async fn create_old_group_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateOldGroupRequest>,
) -> AppResult<Created<old_group_model::Model>> {
    payload.validate()?;

    let old_group = app_state
        .hierarchy_service
        .create_old_group(user.scope(), payload)
        .await?;
    Ok(Created(old_group))
}

pub async fn update_old_group_handler(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    user: AuthenticatedUser,
    Json(payload): Json<UpdateNodeRequest>,
) -> AppResult<ApiResponse<old_group_model::Model>> {
    payload.validate()?;

    let old_group = app_state
        .hierarchy_service
        .update_node::<old_group_model::Entity, old_group_model::ActiveModel>(
            user.scope(),
            id,
            payload,
        )
        .await?;
    Ok(ApiResponse::success(old_group))
}

pub async fn delete_old_group_handler(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    user: AuthenticatedUser,
) -> AppResult<ApiResponse<MessageResponse>> {
    app_state
        .hierarchy_service
        .delete_node::<old_group_model::Entity>(user.scope(), id)
        .await?;
    Ok(ApiResponse::success(MessageResponse::new(
        "Old group deleted successfully",
    )))
}

pub fn hierarchy_router() -> Router<AppState> {
    Router::new()
        .route(
            "/states",
            get(list_states_handler).post(create_state_handler),
        )
        .route(
            "/states/{id}",
            get(get_state_handler)
                .patch(update_state_handler)
                .delete(delete_state_handler),
        )
        .route(
            "/regions",
            get(list_regions_handler).post(create_region_handler),
        )
        .route(
            "/regions/{id}",
            get(get_region_handler)
                .patch(update_region_handler)
                .delete(delete_region_handler),
        )
        .route(
            "/districts",
            get(list_districts_handler).post(create_district_handler),
        )
        .route(
            "/districts/{id}",
            get(get_district_handler)
                .patch(update_district_handler)
                .delete(delete_district_handler),
        )
        .route(
            "/groups",
            get(list_groups_handler).post(create_group_handler),
        )
        .route(
            "/groups/{id}",
            get(get_group_handler)
                .patch(update_group_handler)
                .delete(delete_group_handler),
        )
        .route(
            "/old-groups",
            get(list_old_groups_handler).post(create_old_group_handler),
        )
        .route(
            "/old-groups/{id}",
            get(get_old_group_handler)
                .patch(update_old_group_handler)
                .delete(delete_old_group_handler),
        )
}
