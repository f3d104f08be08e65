// attendance-backend/src/repository/role_repository.rs

use crate::domain::role_model::{
    ActiveModel as RoleActiveModel, Column as RoleColumn, Entity as RoleEntity, Model as Role,
};
use crate::error::AppResult;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

pub struct RoleRepository {
    db: DatabaseConnection,
}

impl RoleRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// ロール一覧を取得
    pub async fn find_all(&self) -> AppResult<Vec<Role>> {
        let roles = RoleEntity::find()
            .order_by_asc(RoleColumn::Name)
            .all(&self.db)
            .await?;
        Ok(roles)
    }

    /// ロールをIDの集合で取得
    pub async fn find_by_ids(&self, role_ids: &[Uuid]) -> AppResult<Vec<Role>> {
        if role_ids.is_empty() {
            return Ok(Vec::new());
        }

        let roles = RoleEntity::find()
            .filter(RoleColumn::Id.is_in(role_ids.iter().copied()))
            .all(&self.db)
            .await?;
        Ok(roles)
    }

    /// ロールを名前で取得
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        let role = RoleEntity::find()
            .filter(RoleColumn::Name.eq(name))
            .one(&self.db)
            .await?;
        Ok(role)
    }

    /// 名前でロールを取得し、なければ作成する
    pub async fn get_or_create(&self, name: &str, description: &str) -> AppResult<Role> {
        if let Some(role) = self.find_by_name(name).await? {
            return Ok(role);
        }

        let model = RoleActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            description: Set(Some(description.to_string())),
        };
        Ok(model.insert(&self.db).await?)
    }
}
