// attendance-backend/src/domain/attendance_model.rs

use super::hierarchy::HierarchyKind;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 出席レコード
///
/// 階層ノードを (entity_kind, entity_id) ペアで参照する追記専用テーブル。
/// (entity_kind, entity_id, week) は一意で、後からの提出が上書きする。
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "attendance_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub entity_kind: String,

    pub entity_id: i32,

    pub week: i32,

    pub submitted_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// entity_kind 列をタグとして解釈
    pub fn kind(&self) -> Option<HierarchyKind> {
        HierarchyKind::from_str(&self.entity_kind)
    }
}
