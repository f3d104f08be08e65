// attendance-backend/src/service/attendance_service.rs

use crate::api::dto::attendance_dto::{EntityAttendanceEntry, MonitorSummaryResponse};
use crate::domain::access_scope::{AccessScope, ScopeIds};
use crate::domain::attendance_model::Model as Attendance;
use crate::domain::attendance_status::AttendanceStatus;
use crate::domain::hierarchy::{HierarchyKind, HierarchyNode};
use crate::domain::{district_model, group_model, old_group_model, region_model, state_model};
use crate::error::{AppError, AppResult};
use crate::repository::attendance_repository::AttendanceRepository;
use crate::repository::hierarchy_repository::HierarchyRepository;
use crate::utils::validation::{is_valid_week, MAX_WEEK, MIN_WEEK};
use std::sync::Arc;
use tracing::info;

/// 出席提出と提出状況評価のサービス
pub struct AttendanceService {
    hierarchy_repo: Arc<HierarchyRepository>,
    attendance_repo: Arc<AttendanceRepository>,
}

impl AttendanceService {
    pub fn new(
        hierarchy_repo: Arc<HierarchyRepository>,
        attendance_repo: Arc<AttendanceRepository>,
    ) -> Self {
        Self {
            hierarchy_repo,
            attendance_repo,
        }
    }

    /// 出席を提出する
    ///
    /// 対象ノードが呼び出し側のスコープ内にあることを要求する。同じ週への
    /// 再提出は上書きになる。
    pub async fn submit(
        &self,
        scope: &AccessScope,
        kind: HierarchyKind,
        entity_id: i32,
        week: i32,
    ) -> AppResult<Attendance> {
        if !is_valid_week(week) {
            return Err(AppError::ValidationError(format!(
                "Week must be between {} and {}",
                MIN_WEEK, MAX_WEEK
            )));
        }

        let ids = self.node_scope_ids(kind, entity_id).await?;
        if !scope.permits(&ids) {
            return Err(AppError::Forbidden(format!(
                "{} is outside your access scope",
                kind.display_name()
            )));
        }

        let record = self.attendance_repo.submit(kind, entity_id, week).await?;

        info!(
            entity_kind = %kind,
            entity_id = %entity_id,
            week = %week,
            "Attendance submitted"
        );
        Ok(record)
    }

    /// 指定ノードの最終提出週を取得（レコードなしは 0）
    pub async fn last_filled_week(&self, kind: HierarchyKind, entity_id: i32) -> AppResult<i32> {
        if !self.hierarchy_repo.exists(kind, entity_id).await? {
            return Err(AppError::NotFound(format!(
                "{} not found",
                kind.display_name()
            )));
        }

        self.attendance_repo.max_week(kind, entity_id).await
    }

    /// 全種別の提出状況ダッシュボードを集計する
    ///
    /// 読み取り専用。書き込みがなければ同じ入力に対して同じ出力を返す。
    pub async fn monitor_summary(&self, current_week: i32) -> AppResult<MonitorSummaryResponse> {
        Ok(MonitorSummaryResponse {
            states: self
                .kind_summary::<state_model::Entity>(current_week)
                .await?,
            regions: self
                .kind_summary::<region_model::Entity>(current_week)
                .await?,
            districts: self
                .kind_summary::<district_model::Entity>(current_week)
                .await?,
            groups: self
                .kind_summary::<group_model::Entity>(current_week)
                .await?,
            old_groups: self
                .kind_summary::<old_group_model::Entity>(current_week)
                .await?,
        })
    }

    /// 1種別分の {id, name, last_filled_week, status} 一覧
    async fn kind_summary<E: HierarchyNode>(
        &self,
        current_week: i32,
    ) -> AppResult<Vec<EntityAttendanceEntry>> {
        let nodes = self.hierarchy_repo.summaries::<E>().await?;
        let last_weeks = self.attendance_repo.last_weeks_for(E::KIND).await?;

        Ok(nodes
            .into_iter()
            .map(|(id, name)| {
                let last_filled_week = last_weeks.get(&id).copied().unwrap_or(0);
                EntityAttendanceEntry {
                    id,
                    name,
                    last_filled_week,
                    status: AttendanceStatus::classify(last_filled_week, current_week),
                }
            })
            .collect())
    }

    /// ノードの存在確認とスコープ判定用 ID 連鎖の取得
    async fn node_scope_ids(&self, kind: HierarchyKind, id: i32) -> AppResult<ScopeIds> {
        match kind {
            HierarchyKind::State => self.fetch_ids::<state_model::Entity>(id).await,
            HierarchyKind::Region => self.fetch_ids::<region_model::Entity>(id).await,
            HierarchyKind::District => self.fetch_ids::<district_model::Entity>(id).await,
            HierarchyKind::Group => self.fetch_ids::<group_model::Entity>(id).await,
            HierarchyKind::OldGroup => self.fetch_ids::<old_group_model::Entity>(id).await,
        }
    }

    async fn fetch_ids<E>(&self, id: i32) -> AppResult<ScopeIds>
    where
        E: HierarchyNode,
        ScopeIds: for<'a> From<&'a E::Model>,
    {
        let node = self
            .hierarchy_repo
            .find_by_id::<E>(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("{} not found", E::KIND.display_name())))?;
        Ok(ScopeIds::from(&node))
    }
}
