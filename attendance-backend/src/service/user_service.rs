// attendance-backend/src/service/user_service.rs

use crate::api::dto::user_dto::{CreateUserRequest, UpdateUserRequest};
use crate::domain::access_scope::AccessScope;
use crate::domain::role_model::{role_rank, Model as Role};
use crate::domain::user_model::{ActiveModel as UserActiveModel, SafeUser, UserClaims};
use crate::error::{AppError, AppResult};
use crate::repository::role_repository::RoleRepository;
use crate::repository::user_repository::UserRepository;
use crate::utils::password::{hash_password, PasswordPolicy};
use sea_orm::{ActiveModelBehavior, IntoActiveModel, Set};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// ユーザー管理サービス
pub struct UserService {
    user_repo: Arc<UserRepository>,
    role_repo: Arc<RoleRepository>,
    password_policy: PasswordPolicy,
}

impl UserService {
    pub fn new(
        user_repo: Arc<UserRepository>,
        role_repo: Arc<RoleRepository>,
        password_policy: PasswordPolicy,
    ) -> Self {
        Self {
            user_repo,
            role_repo,
            password_policy,
        }
    }

    /// ユーザー一覧を取得（スコープ制限付き）
    pub async fn list_users(&self, scope: &AccessScope) -> AppResult<Vec<SafeUser>> {
        let rows = self.user_repo.list_with_roles(scope).await?;

        Ok(rows
            .into_iter()
            .map(|(user, roles)| {
                user.to_safe_user(roles.into_iter().map(|role| role.name).collect())
            })
            .collect())
    }

    /// ユーザーを取得
    pub async fn get_user(&self, user_id: Uuid) -> AppResult<SafeUser> {
        let (user, roles) = self
            .user_repo
            .find_with_roles(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(user.to_safe_user(roles.into_iter().map(|role| role.name).collect()))
    }

    /// ユーザーを作成（階層ロールの昇格ガード付き）
    pub async fn create_user(
        &self,
        current: &UserClaims,
        payload: CreateUserRequest,
    ) -> AppResult<SafeUser> {
        self.password_policy
            .check(&payload.password)
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        if self.user_repo.is_email_taken(&payload.email).await? {
            return Err(AppError::Conflict(
                "User with this email already exists".to_string(),
            ));
        }

        let roles = self.resolve_roles(&payload.roles).await?;
        ensure_can_grant(current, &roles)?;

        let password_hash = hash_password(&payload.password)
            .map_err(|e| AppError::InternalServerError(format!("Password hashing failed: {}", e)))?;

        let mut model = UserActiveModel::new();
        model.email = Set(payload.email.clone());
        model.password_hash = Set(password_hash);
        model.name = Set(payload.name);
        model.phone = Set(payload.phone);
        model.state_id = Set(payload.state_id);
        model.region_id = Set(payload.region_id);
        model.district_id = Set(payload.district_id);
        model.group_id = Set(payload.group_id);
        model.old_group_id = Set(payload.old_group_id);

        let user = self.user_repo.insert(model).await?;

        let role_ids: Vec<Uuid> = roles.iter().map(|role| role.id).collect();
        self.user_repo.set_roles(user.id, &role_ids).await?;

        info!(
            admin_id = %current.user_id,
            user_id = %user.id,
            email = %payload.email,
            "User created"
        );
        Ok(user.to_safe_user(roles.into_iter().map(|role| role.name).collect()))
    }

    /// ユーザーを部分更新
    pub async fn update_user(
        &self,
        current: &UserClaims,
        user_id: Uuid,
        payload: UpdateUserRequest,
    ) -> AppResult<SafeUser> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if let Some(email) = &payload.email {
            if email != &user.email && self.user_repo.is_email_taken(email).await? {
                return Err(AppError::Conflict(
                    "User with this email already exists".to_string(),
                ));
            }
        }

        let mut model = user.into_active_model();

        if let Some(email) = payload.email {
            model.email = Set(email);
        }
        if let Some(name) = payload.name {
            model.name = Set(Some(name));
        }
        if let Some(phone) = payload.phone {
            model.phone = Set(Some(phone));
        }
        if let Some(is_active) = payload.is_active {
            model.is_active = Set(is_active);
        }
        if let Some(state_id) = payload.state_id {
            model.state_id = Set(Some(state_id));
        }
        if let Some(region_id) = payload.region_id {
            model.region_id = Set(Some(region_id));
        }
        if let Some(district_id) = payload.district_id {
            model.district_id = Set(Some(district_id));
        }
        if let Some(group_id) = payload.group_id {
            model.group_id = Set(Some(group_id));
        }
        if let Some(old_group_id) = payload.old_group_id {
            model.old_group_id = Set(Some(old_group_id));
        }

        let user = self.user_repo.update(model).await?;

        // ロールの再割り当ては明示された場合のみ
        if let Some(role_ids) = payload.roles {
            let roles = self.resolve_roles(&role_ids).await?;
            ensure_can_grant(current, &roles)?;

            let ids: Vec<Uuid> = roles.iter().map(|role| role.id).collect();
            self.user_repo.set_roles(user.id, &ids).await?;
        }

        info!(admin_id = %current.user_id, user_id = %user.id, "User updated");

        let role_names = self.user_repo.role_names_of(user.id).await?;
        Ok(user.to_safe_user(role_names))
    }

    /// ユーザーを削除
    ///
    /// 自分自身は削除できない。グローバルスコープロール保持者を削除できる
    /// のは同じくグローバルスコープ保持者のみ。
    pub async fn delete_user(&self, current: &UserClaims, user_id: Uuid) -> AppResult<String> {
        let (user, roles) = self
            .user_repo
            .find_with_roles(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if user.id == current.user_id {
            return Err(AppError::Forbidden(
                "You cannot delete your own account".to_string(),
            ));
        }

        let target_is_global = roles.iter().any(|role| role.grants_global_scope());
        if target_is_global && !current.has_global_role() {
            return Err(AppError::Forbidden(
                "Insufficient permissions to delete this user".to_string(),
            ));
        }

        self.user_repo.delete(user.id).await?;

        info!(admin_id = %current.user_id, user_id = %user.id, "User deleted");
        Ok(user.email)
    }

    /// ロールIDの集合を検証して取得
    async fn resolve_roles(&self, role_ids: &[Uuid]) -> AppResult<Vec<Role>> {
        let roles = self.role_repo.find_by_ids(role_ids).await?;

        if roles.len() != role_ids.len() {
            return Err(AppError::BadRequest("Invalid roles".to_string()));
        }

        Ok(roles)
    }
}

/// ロール昇格ガード
///
/// グローバルスコープ保持者は誰にでも付与できる。それ以外は自分の序列を
/// 超えるロールを付与できない（State Admin は Super Admin を作れない）。
fn ensure_can_grant(current: &UserClaims, target_roles: &[Role]) -> AppResult<()> {
    if current.has_global_role() {
        return Ok(());
    }

    let own_rank = current
        .roles
        .iter()
        .map(|name| role_rank(name))
        .max()
        .unwrap_or(0);

    if target_roles.iter().any(|role| role.rank() > own_rank) {
        return Err(AppError::Forbidden(
            "Insufficient permissions to grant this role".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims_with_roles(roles: &[&str]) -> UserClaims {
        UserClaims {
            user_id: Uuid::new_v4(),
            email: "admin@example.com".to_string(),
            name: None,
            is_active: true,
            roles: roles.iter().map(|r| r.to_string()).collect(),
            state_id: None,
            region_id: None,
            district_id: None,
            group_id: None,
            old_group_id: None,
        }
    }

    fn role(name: &str) -> Role {
        Role {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
        }
    }

    #[test]
    fn test_super_admin_can_grant_anything() {
        let current = claims_with_roles(&["Super Admin"]);
        assert!(ensure_can_grant(&current, &[role("Super Admin")]).is_ok());
        assert!(ensure_can_grant(&current, &[role("State Admin")]).is_ok());
    }

    #[test]
    fn test_state_admin_cannot_grant_super_admin() {
        let current = claims_with_roles(&["State Admin"]);
        assert!(ensure_can_grant(&current, &[role("Super Admin")]).is_err());
        assert!(ensure_can_grant(&current, &[role("State Admin")]).is_ok());
    }

    #[test]
    fn test_region_admin_cannot_grant_higher_roles() {
        let current = claims_with_roles(&["Region Admin"]);
        assert!(ensure_can_grant(&current, &[role("Super Admin")]).is_err());
        assert!(ensure_can_grant(&current, &[role("State Admin")]).is_err());
        assert!(ensure_can_grant(&current, &[role("Region Admin")]).is_ok());
        assert!(ensure_can_grant(&current, &[role("Group Admin")]).is_ok());
    }

    #[test]
    fn test_unranked_roles_are_grantable() {
        let current = claims_with_roles(&["Group Admin"]);
        assert!(ensure_can_grant(&current, &[role("Auditor")]).is_ok());
    }
}
