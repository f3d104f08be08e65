// attendance-backend/src/domain/state_model.rs

use super::access_scope::ScopeIds;
use super::hierarchy::{HierarchyKind, HierarchyNode, HierarchyScoped};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 州エンティティ（階層の根）
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "states")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    #[sea_orm(unique)]
    pub code: String,

    #[sea_orm(nullable)]
    pub leader: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::region_model::Entity")]
    Regions,
}

impl Related<super::region_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Regions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl HierarchyScoped for Entity {
    fn hierarchy_column(kind: HierarchyKind) -> Option<Self::Column> {
        match kind {
            HierarchyKind::State => Some(Column::Id),
            _ => None,
        }
    }
}

impl HierarchyNode for Entity {
    const KIND: HierarchyKind = HierarchyKind::State;

    fn id_column() -> Self::Column {
        Column::Id
    }

    fn name_column() -> Self::Column {
        Column::Name
    }

    fn code_column() -> Self::Column {
        Column::Code
    }
}

impl From<&Model> for ScopeIds {
    fn from(state: &Model) -> Self {
        ScopeIds {
            state_id: Some(state.id),
            ..Default::default()
        }
    }
}
