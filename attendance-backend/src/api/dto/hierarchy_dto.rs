// attendance-backend/src/api/dto/hierarchy_dto.rs

use crate::utils::validation::validate_entity_code;
use serde::Deserialize;
use validator::Validate;

/// 州作成リクエスト
#[derive(Debug, Deserialize, Validate)]
pub struct CreateStateRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(custom(function = "validate_entity_code"))]
    pub code: String,

    #[validate(length(max = 100, message = "Leader must be at most 100 characters"))]
    pub leader: Option<String>,
}

/// 地域作成リクエスト
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRegionRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(custom(function = "validate_entity_code"))]
    pub code: String,

    #[validate(length(max = 100, message = "Leader must be at most 100 characters"))]
    pub leader: Option<String>,

    pub state_id: i32,
}

/// 地区作成リクエスト
///
/// 祖先キーを明示した場合は参照された地域の値との一致を検証する。
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDistrictRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(custom(function = "validate_entity_code"))]
    pub code: String,

    #[validate(length(max = 100, message = "Leader must be at most 100 characters"))]
    pub leader: Option<String>,

    pub region_id: i32,
    pub state_id: Option<i32>,
}

/// グループ作成リクエスト
#[derive(Debug, Deserialize, Validate)]
pub struct CreateGroupRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(custom(function = "validate_entity_code"))]
    pub code: String,

    #[validate(length(max = 100, message = "Leader must be at most 100 characters"))]
    pub leader: Option<String>,

    pub district_id: i32,
    pub region_id: Option<i32>,
    pub state_id: Option<i32>,
}

/// 旧グループ作成リクエスト
#[derive(Debug, Deserialize, Validate)]
pub struct CreateOldGroupRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(custom(function = "validate_entity_code"))]
    pub code: String,

    #[validate(length(max = 100, message = "Leader must be at most 100 characters"))]
    pub leader: Option<String>,

    pub group_id: i32,
    pub district_id: Option<i32>,
    pub region_id: Option<i32>,
    pub state_id: Option<i32>,
}

/// ノード共通の部分更新リクエスト（親の付け替えは対象外）
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateNodeRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(custom(function = "validate_entity_code"))]
    pub code: Option<String>,

    #[validate(length(max = 100, message = "Leader must be at most 100 characters"))]
    pub leader: Option<String>,
}
