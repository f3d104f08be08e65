// attendance-backend/src/domain/district_model.rs

use super::access_scope::ScopeIds;
use super::hierarchy::{HierarchyKind, HierarchyNode, HierarchyScoped};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 地区エンティティ（Region の子、祖先キーは非正規化して保持）
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "districts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    #[sea_orm(unique)]
    pub code: String,

    #[sea_orm(nullable)]
    pub leader: Option<String>,

    pub state_id: i32,

    pub region_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::state_model::Entity",
        from = "Column::StateId",
        to = "super::state_model::Column::Id"
    )]
    State,

    #[sea_orm(
        belongs_to = "super::region_model::Entity",
        from = "Column::RegionId",
        to = "super::region_model::Column::Id"
    )]
    Region,

    #[sea_orm(has_many = "super::group_model::Entity")]
    Groups,
}

impl Related<super::region_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Region.def()
    }
}

impl Related<super::group_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Groups.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl HierarchyScoped for Entity {
    fn hierarchy_column(kind: HierarchyKind) -> Option<Self::Column> {
        match kind {
            HierarchyKind::State => Some(Column::StateId),
            HierarchyKind::Region => Some(Column::RegionId),
            HierarchyKind::District => Some(Column::Id),
            _ => None,
        }
    }
}

impl HierarchyNode for Entity {
    const KIND: HierarchyKind = HierarchyKind::District;

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
    fn from(district: &Model) -> Self {
        ScopeIds {
            state_id: Some(district.state_id),
            region_id: Some(district.region_id),
            district_id: Some(district.id),
            ..Default::default()
        }
    }
}
