// attendance-backend/src/domain/role_model.rs

use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

/// グローバルスコープを付与するロール名
///
/// 「この名前のロールが全データへのアクセスを許す」というポリシーは仕様。
/// 文字列比較はこのモジュールに閉じ、呼び出し側は解決済みの
/// `AccessScope` だけを扱う。
pub const GLOBAL_SCOPE_ROLE: &str = "Super Admin";

/// ロール名がグローバルスコープを付与するかチェック（大文字小文字を区別）
pub fn grants_global_scope(name: &str) -> bool {
    name == GLOBAL_SCOPE_ROLE
}

/// 階層管理ロールの序列（高いほど広い権限）
///
/// ロール集合は開いており、慣例的な名前だけが序列を持つ。慣例外の
/// ロールは序列 0 で、誰でも付与できる。
pub fn role_rank(name: &str) -> u8 {
    match name {
        "Super Admin" => 5,
        "State Admin" => 4,
        "Region Admin" => 3,
        "District Admin" => 2,
        "Group Admin" => 1,
        _ => 0,
    }
}

/// ロールエンティティ（開いた集合、名前で識別）
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "roles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(unique)]
    pub name: String,

    #[sea_orm(nullable)]
    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_role_model::Entity")]
    UserRoles,
}

impl Related<super::user_role_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserRoles.def()
    }
}

// users との多対多リレーション（user_roles 経由）
impl Related<super::user_model::Entity> for Entity {
    fn to() -> RelationDef {
        super::user_role_model::Relation::User.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::user_role_model::Relation::Role.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            id: Set(Uuid::new_v4()),
            ..ActiveModelTrait::default()
        }
    }
}

impl Model {
    /// このロールがグローバルスコープを付与するかチェック
    pub fn grants_global_scope(&self) -> bool {
        grants_global_scope(&self.name)
    }

    /// 序列を取得
    pub fn rank(&self) -> u8 {
        role_rank(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_scope_is_exact_match() {
        assert!(grants_global_scope("Super Admin"));
        assert!(!grants_global_scope("super admin"));
        assert!(!grants_global_scope("SUPER ADMIN"));
        assert!(!grants_global_scope("Super Admin "));
    }

    #[test]
    fn test_role_rank_ordering() {
        assert!(role_rank("Super Admin") > role_rank("State Admin"));
        assert!(role_rank("State Admin") > role_rank("Region Admin"));
        assert!(role_rank("Region Admin") > role_rank("District Admin"));
        assert!(role_rank("District Admin") > role_rank("Group Admin"));
        assert_eq!(role_rank("Auditor"), 0);
    }
}
