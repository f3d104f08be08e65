// attendance-backend/src/repository/hierarchy_repository.rs

use crate::domain::access_scope::{scoped, AccessScope};
use crate::domain::hierarchy::{HierarchyKind, HierarchyNode};
use crate::domain::{district_model, group_model, old_group_model, region_model, state_model};
use crate::error::AppResult;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

/// 階層ノード5種に共通するリポジトリ
///
/// 種別ごとの差は `HierarchyNode` のカラム記述子に集約されているため、
/// CRUD はジェネリクスひとそろいで賄う。
pub struct HierarchyRepository {
    db: DatabaseConnection,
}

impl HierarchyRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// スコープ付きでノード一覧を取得（名前順）
    pub async fn list<E: HierarchyNode>(&self, scope: &AccessScope) -> AppResult<Vec<E::Model>> {
        let models = scoped(E::find(), scope)
            .order_by_asc(E::name_column())
            .all(&self.db)
            .await?;
        Ok(models)
    }

    /// ノードをIDで取得
    pub async fn find_by_id<E: HierarchyNode>(&self, id: i32) -> AppResult<Option<E::Model>> {
        let model = E::find()
            .filter(E::id_column().eq(id))
            .one(&self.db)
            .await?;
        Ok(model)
    }

    /// ノードをコードで取得
    pub async fn find_by_code<E: HierarchyNode>(&self, code: &str) -> AppResult<Option<E::Model>> {
        let model = E::find()
            .filter(E::code_column().eq(code))
            .one(&self.db)
            .await?;
        Ok(model)
    }

    /// コードが既に使われているかチェック（更新時は自ノードを除外）
    pub async fn is_code_taken<E: HierarchyNode>(
        &self,
        code: &str,
        exclude_id: Option<i32>,
    ) -> AppResult<bool>
    where
        E::Model: Send + Sync,
    {
        let mut query = E::find().filter(E::code_column().eq(code));

        if let Some(id) = exclude_id {
            query = query.filter(E::id_column().ne(id));
        }

        Ok(query.count(&self.db).await? > 0)
    }

    /// 指定ノードを親に持つ子ノード数を数える
    ///
    /// 子エンティティが親レベルのキーを持たない場合は 0。
    pub async fn count_children_of<C: HierarchyNode>(
        &self,
        parent_kind: HierarchyKind,
        parent_id: i32,
    ) -> AppResult<u64>
    where
        C::Model: Send + Sync,
    {
        let Some(column) = C::hierarchy_column(parent_kind) else {
            return Ok(0);
        };

        let count = C::find()
            .filter(column.eq(parent_id))
            .count(&self.db)
            .await?;
        Ok(count)
    }

    /// 指定種別のノードが存在するかチェック
    pub async fn exists(&self, kind: HierarchyKind, id: i32) -> AppResult<bool> {
        let found = match kind {
            HierarchyKind::State => self
                .find_by_id::<state_model::Entity>(id)
                .await?
                .is_some(),
            HierarchyKind::Region => self
                .find_by_id::<region_model::Entity>(id)
                .await?
                .is_some(),
            HierarchyKind::District => self
                .find_by_id::<district_model::Entity>(id)
                .await?
                .is_some(),
            HierarchyKind::Group => self
                .find_by_id::<group_model::Entity>(id)
                .await?
                .is_some(),
            HierarchyKind::OldGroup => self
                .find_by_id::<old_group_model::Entity>(id)
                .await?
                .is_some(),
        };
        Ok(found)
    }

    /// モニター集計用の (id, name) 一覧を取得
    pub async fn summaries<E: HierarchyNode>(&self) -> AppResult<Vec<(i32, String)>> {
        let rows = E::find()
            .select_only()
            .column(E::id_column())
            .column(E::name_column())
            .order_by_asc(E::id_column())
            .into_tuple()
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    /// ノードを挿入
    pub async fn insert<A>(&self, model: A) -> AppResult<<A::Entity as EntityTrait>::Model>
    where
        A: ActiveModelTrait + ActiveModelBehavior + Send,
        <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
    {
        Ok(model.insert(&self.db).await?)
    }

    /// ノードを更新
    pub async fn update<A>(&self, model: A) -> AppResult<<A::Entity as EntityTrait>::Model>
    where
        A: ActiveModelTrait + ActiveModelBehavior + Send,
        <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
    {
        Ok(model.update(&self.db).await?)
    }
}
