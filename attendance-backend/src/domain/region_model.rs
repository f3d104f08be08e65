// attendance-backend/src/domain/region_model.rs

use super::access_scope::ScopeIds;
use super::hierarchy::{HierarchyKind, HierarchyNode, HierarchyScoped};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 地域エンティティ（State の子）
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "regions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    #[sea_orm(unique)]
    pub code: String,

    #[sea_orm(nullable)]
    pub leader: Option<String>,

    pub state_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::state_model::Entity",
        from = "Column::StateId",
        to = "super::state_model::Column::Id"
    )]
    State,

    #[sea_orm(has_many = "super::district_model::Entity")]
    Districts,
}

impl Related<super::state_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::State.def()
    }
}

impl Related<super::district_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Districts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl HierarchyScoped for Entity {
    fn hierarchy_column(kind: HierarchyKind) -> Option<Self::Column> {
        match kind {
            HierarchyKind::State => Some(Column::StateId),
            HierarchyKind::Region => Some(Column::Id),
            _ => None,
        }
    }
}

impl HierarchyNode for Entity {
    const KIND: HierarchyKind = HierarchyKind::Region;

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
    fn from(region: &Model) -> Self {
        ScopeIds {
            state_id: Some(region.state_id),
            region_id: Some(region.id),
            ..Default::default()
        }
    }
}
