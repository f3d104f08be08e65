// attendance-backend/src/domain/group_model.rs

use super::access_scope::ScopeIds;
use super::hierarchy::{HierarchyKind, HierarchyNode, HierarchyScoped};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// グループエンティティ（District の子）
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "groups")]
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

    pub district_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::district_model::Entity",
        from = "Column::DistrictId",
        to = "super::district_model::Column::Id"
    )]
    District,

    #[sea_orm(has_many = "super::old_group_model::Entity")]
    OldGroups,
}

impl Related<super::district_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::District.def()
    }
}

impl Related<super::old_group_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OldGroups.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl HierarchyScoped for Entity {
    fn hierarchy_column(kind: HierarchyKind) -> Option<Self::Column> {
        match kind {
            HierarchyKind::State => Some(Column::StateId),
            HierarchyKind::Region => Some(Column::RegionId),
            HierarchyKind::District => Some(Column::DistrictId),
            HierarchyKind::Group => Some(Column::Id),
            HierarchyKind::OldGroup => None,
        }
    }
}

impl HierarchyNode for Entity {
    const KIND: HierarchyKind = HierarchyKind::Group;

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
    fn from(group: &Model) -> Self {
        ScopeIds {
            state_id: Some(group.state_id),
            region_id: Some(group.region_id),
            district_id: Some(group.district_id),
            group_id: Some(group.id),
            ..Default::default()
        }
    }
}
