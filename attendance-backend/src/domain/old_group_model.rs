// attendance-backend/src/domain/old_group_model.rs

use super::access_scope::ScopeIds;
use super::hierarchy::{HierarchyKind, HierarchyNode, HierarchyScoped};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 旧グループエンティティ（Group の子、階層の最深ノード）
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "old_groups")]
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

    pub group_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::group_model::Entity",
        from = "Column::GroupId",
        to = "super::group_model::Column::Id"
    )]
    Group,
}

impl Related<super::group_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl HierarchyScoped for Entity {
    fn hierarchy_column(kind: HierarchyKind) -> Option<Self::Column> {
        match kind {
            HierarchyKind::State => Some(Column::StateId),
            HierarchyKind::Region => Some(Column::RegionId),
            HierarchyKind::District => Some(Column::DistrictId),
            HierarchyKind::Group => Some(Column::GroupId),
            HierarchyKind::OldGroup => Some(Column::Id),
        }
    }
}

impl HierarchyNode for Entity {
    const KIND: HierarchyKind = HierarchyKind::OldGroup;

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
    fn from(old_group: &Model) -> Self {
        ScopeIds {
            state_id: Some(old_group.state_id),
            region_id: Some(old_group.region_id),
            district_id: Some(old_group.district_id),
            group_id: Some(old_group.group_id),
            old_group_id: Some(old_group.id),
        }
    }
}
