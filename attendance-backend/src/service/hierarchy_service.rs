// attendance-backend/src/service/hierarchy_service.rs

use crate::api::dto::hierarchy_dto::{
    CreateDistrictRequest, CreateGroupRequest, CreateOldGroupRequest, CreateRegionRequest,
    CreateStateRequest, UpdateNodeRequest,
};
use crate::domain::access_scope::{AccessScope, ScopeIds};
use crate::domain::attendance_model::{Column as AttendanceColumn, Entity as AttendanceEntity};
use crate::domain::hierarchy::{HierarchyKind, HierarchyNode};
use crate::domain::{district_model, group_model, old_group_model, region_model, state_model};
use crate::error::{AppError, AppResult};
use crate::repository::hierarchy_repository::HierarchyRepository;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter, Set,
    TransactionTrait,
};
use std::sync::Arc;
use tracing::info;

/// 階層ノード管理サービス
///
/// 作成・移動時は参照された親から祖先キーを導出し、リクエストが祖先を
/// 明示した場合は親の持つ値との一致を要求する。
pub struct HierarchyService {
    db: DatabaseConnection,
    repo: Arc<HierarchyRepository>,
}

impl HierarchyService {
    pub fn new(db: DatabaseConnection, repo: Arc<HierarchyRepository>) -> Self {
        Self { db, repo }
    }

    // --- 一覧・取得 ---

    pub async fn list<E>(&self, scope: &AccessScope) -> AppResult<Vec<E::Model>>
    where
        E: HierarchyNode,
    {
        self.repo.list::<E>(scope).await
    }

    /// ノードを取得（スコープ外は Forbidden）
    pub async fn get<E>(&self, scope: &AccessScope, id: i32) -> AppResult<E::Model>
    where
        E: HierarchyNode,
        ScopeIds: for<'a> From<&'a E::Model>,
    {
        let node = self.find_node::<E>(id).await?;

        if !scope.permits(&ScopeIds::from(&node)) {
            return Err(AppError::Forbidden(format!(
                "{} is outside your access scope",
                E::KIND.display_name()
            )));
        }

        Ok(node)
    }

    // --- 作成 ---

    /// 州を作成（グローバルスコープのみ）
    pub async fn create_state(
        &self,
        scope: &AccessScope,
        payload: CreateStateRequest,
    ) -> AppResult<state_model::Model> {
        self.require_global(scope, HierarchyKind::State)?;
        self.ensure_code_free::<state_model::Entity>(&payload.code, None)
            .await?;

        let model = state_model::ActiveModel {
            name: Set(payload.name),
            code: Set(payload.code),
            leader: Set(payload.leader),
            ..Default::default()
        };
        let state = self.repo.insert(model).await?;

        info!(state_id = %state.id, name = %state.name, "State created");
        Ok(state)
    }

    /// 地域を作成
    pub async fn create_region(
        &self,
        scope: &AccessScope,
        payload: CreateRegionRequest,
    ) -> AppResult<region_model::Model> {
        let state = self.find_node::<state_model::Entity>(payload.state_id).await?;

        self.ensure_permitted(
            scope,
            &ScopeIds {
                state_id: Some(state.id),
                ..Default::default()
            },
            HierarchyKind::Region,
        )?;
        self.ensure_code_free::<region_model::Entity>(&payload.code, None)
            .await?;

        let model = region_model::ActiveModel {
            name: Set(payload.name),
            code: Set(payload.code),
            leader: Set(payload.leader),
            state_id: Set(state.id),
            ..Default::default()
        };
        let region = self.repo.insert(model).await?;

        info!(region_id = %region.id, name = %region.name, "Region created");
        Ok(region)
    }

    /// 地区を作成（祖先キーは参照された地域から導出）
    pub async fn create_district(
        &self,
        scope: &AccessScope,
        payload: CreateDistrictRequest,
    ) -> AppResult<district_model::Model> {
        let region = self
            .find_node::<region_model::Entity>(payload.region_id)
            .await?;

        ensure_ancestor_matches(payload.state_id, region.state_id, "state_id", "region")?;

        self.ensure_permitted(
            scope,
            &ScopeIds {
                state_id: Some(region.state_id),
                region_id: Some(region.id),
                ..Default::default()
            },
            HierarchyKind::District,
        )?;
        self.ensure_code_free::<district_model::Entity>(&payload.code, None)
            .await?;

        let model = district_model::ActiveModel {
            name: Set(payload.name),
            code: Set(payload.code),
            leader: Set(payload.leader),
            state_id: Set(region.state_id),
            region_id: Set(region.id),
            ..Default::default()
        };
        let district = self.repo.insert(model).await?;

        info!(district_id = %district.id, name = %district.name, "District created");
        Ok(district)
    }

    /// グループを作成（祖先キーは参照された地区から導出）
    pub async fn create_group(
        &self,
        scope: &AccessScope,
        payload: CreateGroupRequest,
    ) -> AppResult<group_model::Model> {
        let district = self
            .find_node::<district_model::Entity>(payload.district_id)
            .await?;

        ensure_ancestor_matches(payload.state_id, district.state_id, "state_id", "district")?;
        ensure_ancestor_matches(payload.region_id, district.region_id, "region_id", "district")?;

        self.ensure_permitted(scope, &ScopeIds::from(&district), HierarchyKind::Group)?;
        self.ensure_code_free::<group_model::Entity>(&payload.code, None)
            .await?;

        let model = group_model::ActiveModel {
            name: Set(payload.name),
            code: Set(payload.code),
            leader: Set(payload.leader),
            state_id: Set(district.state_id),
            region_id: Set(district.region_id),
            district_id: Set(district.id),
            ..Default::default()
        };
        let group = self.repo.insert(model).await?;

        info!(group_id = %group.id, name = %group.name, "Group created");
        Ok(group)
    }

    /// 旧グループを作成（祖先キーは参照されたグループから導出）
    pub async fn create_old_group(
        &self,
        scope: &AccessScope,
        payload: CreateOldGroupRequest,
    ) -> AppResult<old_group_model::Model> {
        let group = self
            .find_node::<group_model::Entity>(payload.group_id)
            .await?;

        ensure_ancestor_matches(payload.state_id, group.state_id, "state_id", "group")?;
        ensure_ancestor_matches(payload.region_id, group.region_id, "region_id", "group")?;
        ensure_ancestor_matches(payload.district_id, group.district_id, "district_id", "group")?;

        self.ensure_permitted(scope, &ScopeIds::from(&group), HierarchyKind::OldGroup)?;
        self.ensure_code_free::<old_group_model::Entity>(&payload.code, None)
            .await?;

        let model = old_group_model::ActiveModel {
            name: Set(payload.name),
            code: Set(payload.code),
            leader: Set(payload.leader),
            state_id: Set(group.state_id),
            region_id: Set(group.region_id),
            district_id: Set(group.district_id),
            group_id: Set(group.id),
            ..Default::default()
        };
        let old_group = self.repo.insert(model).await?;

        info!(old_group_id = %old_group.id, name = %old_group.name, "Old group created");
        Ok(old_group)
    }

    // --- 更新（名前・コード・リーダーの部分更新） ---

    pub async fn update_node<E, A>(
        &self,
        scope: &AccessScope,
        id: i32,
        payload: UpdateNodeRequest,
    ) -> AppResult<E::Model>
    where
        E: HierarchyNode,
        A: sea_orm::ActiveModelTrait<Entity = E>
            + sea_orm::ActiveModelBehavior
            + NodeActiveModel
            + Send,
        E::Model: IntoActiveModel<A>,
        E::Model: Send + Sync,
        ScopeIds: for<'a> From<&'a E::Model>,
    {
        let node = self.get::<E>(scope, id).await?;

        if let Some(code) = &payload.code {
            self.ensure_code_free::<E>(code, Some(id)).await?;
        }

        let mut model: A = node.into_active_model();
        if let Some(name) = payload.name {
            model.set_name(name);
        }
        if let Some(code) = payload.code {
            model.set_code(code);
        }
        if let Some(leader) = payload.leader {
            model.set_leader(Some(leader));
        }

        let updated = self.repo.update(model).await?;
        info!(id = %id, kind = %E::KIND, "Hierarchy node updated");
        Ok(updated)
    }

    // --- 削除 ---

    /// ノードを削除する
    ///
    /// 子ノードが残っている場合は拒否。出席レコードは同一トランザクションで
    /// 取り除く。ユーザーの階層キーは外部キーの SET NULL に任せる。
    pub async fn delete_node<E>(&self, scope: &AccessScope, id: i32) -> AppResult<()>
    where
        E: HierarchyNode,
        ScopeIds: for<'a> From<&'a E::Model>,
    {
        self.get::<E>(scope, id).await?;

        let children = self.count_children(E::KIND, id).await?;
        if children > 0 {
            return Err(AppError::Conflict(format!(
                "Cannot delete {}: {} child node(s) still reference it",
                E::KIND.display_name().to_lowercase(),
                children
            )));
        }

        let txn = self.db.begin().await?;

        AttendanceEntity::delete_many()
            .filter(AttendanceColumn::EntityKind.eq(E::KIND.as_str()))
            .filter(AttendanceColumn::EntityId.eq(id))
            .exec(&txn)
            .await?;

        E::delete_many()
            .filter(E::id_column().eq(id))
            .exec(&txn)
            .await?;

        txn.commit().await?;

        info!(id = %id, kind = %E::KIND, "Hierarchy node deleted");
        Ok(())
    }

    // --- 内部ヘルパー ---

    async fn find_node<E>(&self, id: i32) -> AppResult<E::Model>
    where
        E: HierarchyNode,
    {
        self.repo
            .find_by_id::<E>(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("{} not found", E::KIND.display_name())))
    }

    async fn ensure_code_free<E>(&self, code: &str, exclude_id: Option<i32>) -> AppResult<()>
    where
        E: HierarchyNode,
        E::Model: Send + Sync,
    {
        if self.repo.is_code_taken::<E>(code, exclude_id).await? {
            return Err(AppError::Conflict(format!(
                "{} with code '{}' already exists",
                E::KIND.display_name(),
                code
            )));
        }
        Ok(())
    }

    fn require_global(&self, scope: &AccessScope, kind: HierarchyKind) -> AppResult<()> {
        if !scope.is_global() {
            return Err(AppError::Forbidden(format!(
                "Global scope is required to manage {}s",
                kind.as_str()
            )));
        }
        Ok(())
    }

    fn ensure_permitted(
        &self,
        scope: &AccessScope,
        row: &ScopeIds,
        kind: HierarchyKind,
    ) -> AppResult<()> {
        if !scope.permits(row) {
            return Err(AppError::Forbidden(format!(
                "{} is outside your access scope",
                kind.display_name()
            )));
        }
        Ok(())
    }

    async fn count_children(&self, kind: HierarchyKind, id: i32) -> AppResult<u64> {
        match kind {
            HierarchyKind::State => {
                self.repo
                    .count_children_of::<region_model::Entity>(kind, id)
                    .await
            }
            HierarchyKind::Region => {
                self.repo
                    .count_children_of::<district_model::Entity>(kind, id)
                    .await
            }
            HierarchyKind::District => {
                self.repo
                    .count_children_of::<group_model::Entity>(kind, id)
                    .await
            }
            HierarchyKind::Group => {
                self.repo
                    .count_children_of::<old_group_model::Entity>(kind, id)
                    .await
            }
            HierarchyKind::OldGroup => Ok(0),
        }
    }
}

/// 明示された祖先キーが親の持つ値と一致するかチェック
fn ensure_ancestor_matches(
    declared: Option<i32>,
    actual: i32,
    field: &str,
    parent: &str,
) -> AppResult<()> {
    match declared {
        Some(declared) if declared != actual => Err(AppError::ValidationError(format!(
            "{} does not match the referenced {}",
            field, parent
        ))),
        _ => Ok(()),
    }
}

/// ノード共通フィールドへの書き込み口
///
/// 部分更新をジェネリクスで書くためのアクセサ。各ノードの ActiveModel が実装する。
pub trait NodeActiveModel {
    fn set_name(&mut self, name: String);
    fn set_code(&mut self, code: String);
    fn set_leader(&mut self, leader: Option<String>);
}

macro_rules! impl_node_active_model {
    ($($module:ident),*) => {
        $(
            impl NodeActiveModel for crate::domain::$module::ActiveModel {
                fn set_name(&mut self, name: String) {
                    self.name = Set(name);
                }

                fn set_code(&mut self, code: String) {
                    self.code = Set(code);
                }

                fn set_leader(&mut self, leader: Option<String>) {
                    self.leader = Set(leader);
                }
            }
        )*
    };
}

impl_node_active_model!(
    state_model,
    region_model,
    district_model,
    group_model,
    old_group_model
);
