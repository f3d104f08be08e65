// attendance-backend/src/repository/user_repository.rs

use crate::domain::access_scope::{scoped, AccessScope};
use crate::domain::hierarchy::{HierarchyKind, HierarchyScoped};
use crate::domain::role_model::{Entity as RoleEntity, Model as Role};
use crate::domain::user_model::{
    ActiveModel as UserActiveModel, Column as UserColumn, Entity as UserEntity, Model as User,
};
use crate::domain::user_role_model::{
    ActiveModel as UserRoleActiveModel, Column as UserRoleColumn, Entity as UserRoleEntity,
};
use crate::error::AppResult;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// ユーザーをIDで取得
    pub async fn find_by_id(&self, user_id: Uuid) -> AppResult<Option<User>> {
        Ok(UserEntity::find_by_id(user_id).one(&self.db).await?)
    }

    /// ユーザーをメールアドレスで取得
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = UserEntity::find()
            .filter(UserColumn::Email.eq(email))
            .one(&self.db)
            .await?;
        Ok(user)
    }

    /// メールアドレスが既に登録済みかチェック
    pub async fn is_email_taken(&self, email: &str) -> AppResult<bool> {
        let count = UserEntity::find()
            .filter(UserColumn::Email.eq(email))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    /// ユーザーをロール付きで取得
    pub async fn find_with_roles(&self, user_id: Uuid) -> AppResult<Option<(User, Vec<Role>)>> {
        let mut rows = UserEntity::find_by_id(user_id)
            .find_with_related(RoleEntity)
            .all(&self.db)
            .await?;
        Ok(rows.pop())
    }

    /// スコープ付きでユーザー一覧をロール込みで取得
    pub async fn list_with_roles(&self, scope: &AccessScope) -> AppResult<Vec<(User, Vec<Role>)>> {
        let rows = scoped(UserEntity::find(), scope)
            .order_by_asc(UserColumn::Email)
            .find_with_related(RoleEntity)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    /// 全ユーザーを取得（一斉リマインド用）
    pub async fn find_all(&self) -> AppResult<Vec<User>> {
        let users = UserEntity::find()
            .order_by_asc(UserColumn::Email)
            .all(&self.db)
            .await?;
        Ok(users)
    }

    /// 指定ノードに直接紐づくユーザーを取得（対象リマインド用）
    pub async fn find_attached_to(&self, kind: HierarchyKind, entity_id: i32) -> AppResult<Vec<User>> {
        let Some(column) = UserEntity::hierarchy_column(kind) else {
            return Ok(Vec::new());
        };

        let users = UserEntity::find()
            .filter(column.eq(entity_id))
            .order_by_asc(UserColumn::Email)
            .all(&self.db)
            .await?;
        Ok(users)
    }

    /// ユーザーを作成
    pub async fn insert(&self, model: UserActiveModel) -> AppResult<User> {
        Ok(model.insert(&self.db).await?)
    }

    /// ユーザーを更新
    pub async fn update(&self, model: UserActiveModel) -> AppResult<User> {
        Ok(model.update(&self.db).await?)
    }

    /// ユーザーを削除（ロール割り当ても同時に消す）
    pub async fn delete(&self, user_id: Uuid) -> AppResult<u64> {
        UserRoleEntity::delete_many()
            .filter(UserRoleColumn::UserId.eq(user_id))
            .exec(&self.db)
            .await?;

        let result = UserEntity::delete_by_id(user_id).exec(&self.db).await?;
        Ok(result.rows_affected)
    }

    /// ユーザーのロール割り当てを置き換える
    pub async fn set_roles(&self, user_id: Uuid, role_ids: &[Uuid]) -> AppResult<()> {
        UserRoleEntity::delete_many()
            .filter(UserRoleColumn::UserId.eq(user_id))
            .exec(&self.db)
            .await?;

        if role_ids.is_empty() {
            return Ok(());
        }

        let assignments: Vec<UserRoleActiveModel> = role_ids
            .iter()
            .map(|role_id| UserRoleActiveModel {
                user_id: Set(user_id),
                role_id: Set(*role_id),
            })
            .collect();

        UserRoleEntity::insert_many(assignments)
            .exec(&self.db)
            .await?;
        Ok(())
    }

    /// ユーザーのロール名一覧を取得
    pub async fn role_names_of(&self, user_id: Uuid) -> AppResult<Vec<String>> {
        let roles = self
            .find_with_roles(user_id)
            .await?
            .map(|(_, roles)| roles)
            .unwrap_or_default();
        Ok(roles.into_iter().map(|role| role.name).collect())
    }
}
