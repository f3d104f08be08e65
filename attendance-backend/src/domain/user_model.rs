// attendance-backend/src/domain/user_model.rs

use super::access_scope::{AccessScope, ScopeIds};
use super::hierarchy::{HierarchyKind, HierarchyScoped};
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, DbErr, Set};
use serde::{Deserialize, Serialize};

/// 管理ユーザーエンティティ
///
/// 5 本の NULL 許容階層キーは高々 1 系統のみ意味を持ち、読み込み時に
/// `AccessScope` へ畳み込まれる。
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(unique)]
    pub email: String,

    #[serde(skip_serializing)] // パスワードハッシュは絶対にシリアライズしない
    pub password_hash: String,

    #[sea_orm(nullable)]
    pub name: Option<String>,

    #[sea_orm(nullable)]
    pub phone: Option<String>,

    pub is_active: bool,

    #[sea_orm(nullable)]
    pub state_id: Option<i32>,

    #[sea_orm(nullable)]
    pub region_id: Option<i32>,

    #[sea_orm(nullable)]
    pub district_id: Option<i32>,

    #[sea_orm(nullable)]
    pub group_id: Option<i32>,

    #[sea_orm(nullable)]
    pub old_group_id: Option<i32>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
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

// roles との多対多リレーション（user_roles 経由）
impl Related<super::role_model::Entity> for Entity {
    fn to() -> RelationDef {
        super::user_role_model::Relation::Role.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::user_role_model::Relation::User.def().rev())
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            id: Set(Uuid::new_v4()),
            is_active: Set(true),
            created_at: Set(Utc::now()),
            updated_at: Set(Utc::now()),
            ..ActiveModelTrait::default()
        }
    }

    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if !insert {
            self.updated_at = Set(Utc::now());
        }
        Ok(self)
    }
}

impl HierarchyScoped for Entity {
    fn hierarchy_column(kind: HierarchyKind) -> Option<Self::Column> {
        match kind {
            HierarchyKind::State => Some(Column::StateId),
            HierarchyKind::Region => Some(Column::RegionId),
            HierarchyKind::District => Some(Column::DistrictId),
            HierarchyKind::Group => Some(Column::GroupId),
            HierarchyKind::OldGroup => Some(Column::OldGroupId),
        }
    }
}

impl Model {
    /// ユーザーが認証可能な状態かチェック
    pub fn can_authenticate(&self) -> bool {
        self.is_active
    }

    /// パスワードハッシュを除いたセーフなユーザー情報を取得
    pub fn to_safe_user(&self, role_names: Vec<String>) -> SafeUser {
        SafeUser {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
            phone: self.phone.clone(),
            is_active: self.is_active,
            roles: role_names,
            state_id: self.state_id,
            region_id: self.region_id,
            district_id: self.district_id,
            group_id: self.group_id,
            old_group_id: self.old_group_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// JWT に埋め込むクレームを構築
    pub fn to_claims(&self, role_names: Vec<String>) -> UserClaims {
        UserClaims {
            user_id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
            is_active: self.is_active,
            roles: role_names,
            state_id: self.state_id,
            region_id: self.region_id,
            district_id: self.district_id,
            group_id: self.group_id,
            old_group_id: self.old_group_id,
        }
    }
}

/// パスワードハッシュを含まないセーフなユーザー表現
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SafeUser {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub is_active: bool,
    pub roles: Vec<String>,
    pub state_id: Option<i32>,
    pub region_id: Option<i32>,
    pub district_id: Option<i32>,
    pub group_id: Option<i32>,
    pub old_group_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// JWT のクレーム用のユーザー情報
///
/// スコープ解決に必要な情報（ロール名と階層キー）を発行時に確定して埋め込む。
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserClaims {
    pub user_id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub is_active: bool,
    pub roles: Vec<String>,
    pub state_id: Option<i32>,
    pub region_id: Option<i32>,
    pub district_id: Option<i32>,
    pub group_id: Option<i32>,
    pub old_group_id: Option<i32>,
}

impl UserClaims {
    /// クレームからアクセススコープを構築する（リクエストごとに一度）
    pub fn access_scope(&self) -> AccessScope {
        let ids = ScopeIds {
            state_id: self.state_id,
            region_id: self.region_id,
            district_id: self.district_id,
            group_id: self.group_id,
            old_group_id: self.old_group_id,
        };
        AccessScope::from_ids(ids, &self.roles)
    }

    /// いずれかのロール名を保持しているかチェック
    pub fn has_any_role(&self, names: &[&str]) -> bool {
        self.roles.iter().any(|role| names.contains(&role.as_str()))
    }

    /// グローバルスコープロールを保持しているかチェック
    pub fn has_global_role(&self) -> bool {
        self.access_scope().is_global()
    }
}
