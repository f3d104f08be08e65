// attendance-backend/src/api/dto/import_dto.rs

use crate::utils::validation::validate_entity_code;
use serde::{Deserialize, Serialize};
use validator::Validate;

// --- 州の行単位インポート ---

/// 州インポートの1行
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StateImportRow {
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: String,

    #[validate(custom(function = "validate_entity_code"))]
    pub code: Option<String>,

    #[validate(length(max = 100, message = "leader must be at most 100 characters"))]
    pub leader: Option<String>,
}

/// 州インポートリクエスト
///
/// 行単位の検証はサービス側で行う（不正な行が残りを止めないように）。
#[derive(Debug, Deserialize)]
pub struct ImportStatesRequest {
    pub rows: Vec<StateImportRow>,
}

/// 行単位のエラー記録
#[derive(Debug, Clone, Serialize)]
pub struct ImportRowError {
    pub row: usize,
    pub error: String,
}

/// 州インポートの結果
#[derive(Debug, Default, Serialize)]
pub struct StateImportSummary {
    pub created: usize,
    pub updated: usize,
    pub errors: Vec<ImportRowError>,
}

// --- 階層ドキュメントの一括インポート ---

/// インポートする州・地域のシード
#[derive(Debug, Deserialize, Validate)]
pub struct NodeSeed {
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: String,

    #[validate(custom(function = "validate_entity_code"))]
    pub code: String,

    #[validate(length(max = 100, message = "leader must be at most 100 characters"))]
    pub leader: Option<String>,
}

/// インポートする旧グループ
#[derive(Debug, Deserialize, Validate)]
pub struct OldGroupImport {
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: String,

    #[validate(custom(function = "validate_entity_code"))]
    pub code: String,

    #[validate(length(max = 100, message = "leader must be at most 100 characters"))]
    pub leader: Option<String>,
}

/// インポートするグループ（配下の旧グループを含む）
#[derive(Debug, Deserialize, Validate)]
pub struct GroupImport {
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: String,

    #[validate(custom(function = "validate_entity_code"))]
    pub code: String,

    #[validate(length(max = 100, message = "leader must be at most 100 characters"))]
    pub leader: Option<String>,

    #[serde(default)]
    #[validate(nested)]
    pub old_groups: Vec<OldGroupImport>,
}

/// インポートする地区（配下のグループを含む）
#[derive(Debug, Deserialize, Validate)]
pub struct DistrictImport {
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: String,

    #[validate(custom(function = "validate_entity_code"))]
    pub code: String,

    #[validate(length(max = 100, message = "leader must be at most 100 characters"))]
    pub leader: Option<String>,

    #[serde(default)]
    #[validate(nested)]
    pub groups: Vec<GroupImport>,
}

/// 階層一括インポートのドキュメント
#[derive(Debug, Deserialize, Validate)]
pub struct HierarchyImportRequest {
    #[validate(nested)]
    pub state: NodeSeed,

    #[validate(nested)]
    pub region: NodeSeed,

    #[validate(nested)]
    pub districts: Vec<DistrictImport>,
}

/// 階層一括インポートの結果
#[derive(Debug, Default, Serialize)]
pub struct HierarchyImportSummary {
    pub states_created: usize,
    pub regions_created: usize,
    pub districts_created: usize,
    pub groups_created: usize,
    pub old_groups_created: usize,
    pub users_created: usize,
}
