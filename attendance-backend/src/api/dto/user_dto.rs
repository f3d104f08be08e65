// attendance-backend/src/api/dto/user_dto.rs

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// ユーザー作成リクエスト
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(length(min = 3, max = 20, message = "Phone must be 3-20 characters"))]
    pub phone: Option<String>,

    /// 付与するロールID
    #[serde(default)]
    pub roles: Vec<Uuid>,

    // 階層への割り当て（高々1系統が意味を持つ）
    pub state_id: Option<i32>,
    pub region_id: Option<i32>,
    pub district_id: Option<i32>,
    pub group_id: Option<i32>,
    pub old_group_id: Option<i32>,
}

/// ユーザー部分更新リクエスト
///
/// 指定されたフィールドだけを書き換える。
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(length(min = 3, max = 20, message = "Phone must be 3-20 characters"))]
    pub phone: Option<String>,

    pub is_active: Option<bool>,

    /// 指定された場合はロール割り当てを置き換える
    pub roles: Option<Vec<Uuid>>,

    pub state_id: Option<i32>,
    pub region_id: Option<i32>,
    pub district_id: Option<i32>,
    pub group_id: Option<i32>,
    pub old_group_id: Option<i32>,
}
