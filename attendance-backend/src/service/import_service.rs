// attendance-backend/src/service/import_service.rs

use crate::api::dto::import_dto::{
    HierarchyImportRequest, HierarchyImportSummary, ImportRowError, StateImportRow,
    StateImportSummary,
};
use crate::error::{AppError, AppResult};
use crate::repository::role_repository::RoleRepository;
use crate::utils::password::hash_password;
use crate::domain::{
    district_model, group_model, old_group_model, region_model, state_model, user_model,
    user_role_model,
};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, IntoActiveModel, QueryFilter, Set, TransactionTrait,
};
use std::env;
use std::sync::Arc;
use tracing::info;
use validator::{Validate, ValidationErrors};

/// インポート用の設定
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// 生成されるグループ管理者の初期パスワード
    pub default_password: String,
    /// 生成されるグループ管理者のメールドメイン
    pub email_domain: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            default_password: "12345678".to_string(),
            email_domain: "groups.local".to_string(),
        }
    }
}

impl ImportConfig {
    /// 環境変数から設定を読み込み
    pub fn from_env() -> Self {
        Self {
            default_password: env::var("IMPORT_DEFAULT_PASSWORD")
                .unwrap_or_else(|_| "12345678".to_string()),
            email_domain: env::var("IMPORT_USER_EMAIL_DOMAIN")
                .unwrap_or_else(|_| "groups.local".to_string()),
        }
    }
}

/// 一括インポートサービス
///
/// 位置依存のスプレッドシート走査は行わない。スキーマ検証済みの
/// ドキュメントだけを受け付ける。
pub struct ImportService {
    db: DatabaseConnection,
    role_repo: Arc<RoleRepository>,
    config: ImportConfig,
}

impl ImportService {
    pub fn new(db: DatabaseConnection, role_repo: Arc<RoleRepository>, config: ImportConfig) -> Self {
        Self {
            db,
            role_repo,
            config,
        }
    }

    /// 州の行単位インポート
    ///
    /// 不正な行はエラー一覧に記録して残りの行の処理を続ける。名前が一致する
    /// 既存の州は更新し、それ以外は新規作成する。ストレージのコミット失敗は
    /// 全体をロールバックする。
    pub async fn import_states(&self, rows: Vec<StateImportRow>) -> AppResult<StateImportSummary> {
        let txn = self.db.begin().await?;

        let mut summary = StateImportSummary::default();

        for (index, row) in rows.into_iter().enumerate() {
            let row_number = index + 1;

            if let Err(errors) = row.validate() {
                summary.errors.push(ImportRowError {
                    row: row_number,
                    error: validation_message(&errors),
                });
                continue;
            }

            let existing = state_model::Entity::find()
                .filter(state_model::Column::Name.eq(row.name.trim()))
                .one(&txn)
                .await?;

            match existing {
                Some(state) => {
                    let mut model = state.into_active_model();
                    if let Some(code) = &row.code {
                        model.code = Set(code.clone());
                    }
                    if let Some(leader) = &row.leader {
                        model.leader = Set(Some(leader.clone()));
                    }
                    model.update(&txn).await?;
                    summary.updated += 1;
                }
                None => {
                    let Some(code) = row.code.clone() else {
                        summary.errors.push(ImportRowError {
                            row: row_number,
                            error: "code is required for a new state".to_string(),
                        });
                        continue;
                    };

                    let model = state_model::ActiveModel {
                        name: Set(row.name.trim().to_string()),
                        code: Set(code),
                        leader: Set(row.leader.clone()),
                        ..Default::default()
                    };
                    model.insert(&txn).await?;
                    summary.created += 1;
                }
            }
        }

        txn.commit().await?;

        info!(
            created = %summary.created,
            updated = %summary.updated,
            errors = %summary.errors.len(),
            "State import finished"
        );
        Ok(summary)
    }

    /// 階層ドキュメントの一括インポート（全体で1トランザクション）
    ///
    /// state → region → districts → groups → old_groups を作成し、グループ
    /// ごとに初期パスワードのグループ管理者を1人生成する。途中で失敗した
    /// 場合は何もコミットされない。
    pub async fn import_hierarchy(
        &self,
        doc: HierarchyImportRequest,
    ) -> AppResult<HierarchyImportSummary> {
        let group_admin_role = self
            .role_repo
            .get_or_create("Group Admin", "Administrator for a specific group")
            .await?;

        let password_hash = hash_password(&self.config.default_password)
            .map_err(|e| AppError::InternalServerError(format!("Password hashing failed: {}", e)))?;

        let txn = self.db.begin().await?;
        let mut summary = HierarchyImportSummary::default();

        // State は get-or-create
        let state = match state_model::Entity::find()
            .filter(state_model::Column::Name.eq(doc.state.name.as_str()))
            .one(&txn)
            .await?
        {
            Some(state) => state,
            None => {
                let model = state_model::ActiveModel {
                    name: Set(doc.state.name.clone()),
                    code: Set(doc.state.code.clone()),
                    leader: Set(doc.state.leader.clone()),
                    ..Default::default()
                };
                summary.states_created += 1;
                model.insert(&txn).await?
            }
        };

        // Region も state 配下で get-or-create
        let region = match region_model::Entity::find()
            .filter(region_model::Column::Name.eq(doc.region.name.as_str()))
            .filter(region_model::Column::StateId.eq(state.id))
            .one(&txn)
            .await?
        {
            Some(region) => region,
            None => {
                let model = region_model::ActiveModel {
                    name: Set(doc.region.name.clone()),
                    code: Set(doc.region.code.clone()),
                    leader: Set(doc.region.leader.clone()),
                    state_id: Set(state.id),
                    ..Default::default()
                };
                summary.regions_created += 1;
                model.insert(&txn).await?
            }
        };

        for district_doc in &doc.districts {
            let district = district_model::ActiveModel {
                name: Set(district_doc.name.clone()),
                code: Set(district_doc.code.clone()),
                leader: Set(district_doc.leader.clone()),
                state_id: Set(state.id),
                region_id: Set(region.id),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            summary.districts_created += 1;

            for group_doc in &district_doc.groups {
                let group = group_model::ActiveModel {
                    name: Set(group_doc.name.clone()),
                    code: Set(group_doc.code.clone()),
                    leader: Set(group_doc.leader.clone()),
                    state_id: Set(state.id),
                    region_id: Set(region.id),
                    district_id: Set(district.id),
                    ..Default::default()
                }
                .insert(&txn)
                .await?;
                summary.groups_created += 1;

                // グループごとに管理者アカウントを1人用意する
                if self
                    .ensure_group_admin(&txn, &group, group_admin_role.id, &password_hash)
                    .await?
                {
                    summary.users_created += 1;
                }

                for old_group_doc in &group_doc.old_groups {
                    old_group_model::ActiveModel {
                        name: Set(old_group_doc.name.clone()),
                        code: Set(old_group_doc.code.clone()),
                        leader: Set(old_group_doc.leader.clone()),
                        state_id: Set(state.id),
                        region_id: Set(region.id),
                        district_id: Set(district.id),
                        group_id: Set(group.id),
                        ..Default::default()
                    }
                    .insert(&txn)
                    .await?;
                    summary.old_groups_created += 1;
                }
            }
        }

        txn.commit().await?;

        info!(
            states = %summary.states_created,
            regions = %summary.regions_created,
            districts = %summary.districts_created,
            groups = %summary.groups_created,
            old_groups = %summary.old_groups_created,
            users = %summary.users_created,
            "Hierarchy import finished"
        );
        Ok(summary)
    }

    /// グループ管理者アカウントの get-or-create
    ///
    /// 既存アカウントは階層リンクをグループに付け替える。戻り値は
    /// 新規作成したかどうか。
    async fn ensure_group_admin(
        &self,
        txn: &DatabaseTransaction,
        group: &group_model::Model,
        role_id: uuid::Uuid,
        password_hash: &str,
    ) -> AppResult<bool> {
        let email = format!("{}@{}", slugify(&group.name), self.config.email_domain);

        let (user, created) = match user_model::Entity::find()
            .filter(user_model::Column::Email.eq(email.as_str()))
            .one(txn)
            .await?
        {
            Some(existing) => {
                let mut model = existing.into_active_model();
                model.state_id = Set(Some(group.state_id));
                model.region_id = Set(Some(group.region_id));
                model.district_id = Set(Some(group.district_id));
                model.group_id = Set(Some(group.id));
                model.old_group_id = Set(None);
                (model.update(txn).await?, false)
            }
            None => {
                let mut model = user_model::ActiveModel::new();
                model.email = Set(email.clone());
                model.password_hash = Set(password_hash.to_string());
                model.name = Set(Some(format!("{} Admin", group.name)));
                model.state_id = Set(Some(group.state_id));
                model.region_id = Set(Some(group.region_id));
                model.district_id = Set(Some(group.district_id));
                model.group_id = Set(Some(group.id));
                (model.insert(txn).await?, true)
            }
        };

        let has_role = user_role_model::Entity::find()
            .filter(user_role_model::Column::UserId.eq(user.id))
            .filter(user_role_model::Column::RoleId.eq(role_id))
            .one(txn)
            .await?
            .is_some();

        if !has_role {
            user_role_model::ActiveModel {
                user_id: Set(user.id),
                role_id: Set(role_id),
            }
            .insert(txn)
            .await?;
        }

        Ok(created)
    }
}

/// グループ名からアカウント名を導出する
fn slugify(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            ' ' | '-' => Some('_'),
            '\'' => None,
            c if c.is_ascii_alphanumeric() || c == '_' => Some(c),
            _ => None,
        })
        .collect()
}

/// ValidationErrors を1行のメッセージに畳む
fn validation_message(errors: &ValidationErrors) -> String {
    let messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                let message = error
                    .message
                    .as_ref()
                    .map_or_else(|| "Invalid value".to_string(), |m| m.to_string());
                format!("{}: {}", field, message)
            })
        })
        .collect();
    messages.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_matches_account_conventions() {
        assert_eq!(slugify("Uniport Group"), "uniport_group");
        assert_eq!(slugify("St. Mary's Fellowship"), "st_marys_fellowship");
        assert_eq!(slugify("Port-Harcourt"), "port_harcourt");
        assert_eq!(slugify("  Corper Group  "), "corper_group");
    }

    #[test]
    fn test_validation_message_is_single_line() {
        let row = StateImportRow {
            name: "".to_string(),
            code: None,
            leader: None,
        };
        let errors = row.validate().unwrap_err();
        let message = validation_message(&errors);

        assert!(!message.contains('\n'));
        assert!(message.contains("name"));
    }
}
