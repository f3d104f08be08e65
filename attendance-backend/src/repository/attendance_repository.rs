// attendance-backend/src/repository/attendance_repository.rs

use crate::domain::attendance_model::{
    ActiveModel as AttendanceActiveModel, Column as AttendanceColumn, Entity as AttendanceEntity,
    Model as Attendance,
};
use crate::domain::hierarchy::HierarchyKind;
use crate::error::AppResult;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect, Set,
};
use std::collections::HashMap;

pub struct AttendanceRepository {
    db: DatabaseConnection,
}

impl AttendanceRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// 指定ノードの最終提出週を取得
    ///
    /// レコードが存在しない場合は番兵値 0 を返す。
    pub async fn max_week(&self, kind: HierarchyKind, entity_id: i32) -> AppResult<i32> {
        let row: Option<Option<i32>> = AttendanceEntity::find()
            .select_only()
            .column_as(AttendanceColumn::Week.max(), "max_week")
            .filter(AttendanceColumn::EntityKind.eq(kind.as_str()))
            .filter(AttendanceColumn::EntityId.eq(entity_id))
            .into_tuple()
            .one(&self.db)
            .await?;

        Ok(row.flatten().unwrap_or(0))
    }

    /// 種別内の全ノードの最終提出週をまとめて取得
    ///
    /// レコードのないノードはマップに現れない（呼び出し側が 0 扱いする）。
    pub async fn last_weeks_for(&self, kind: HierarchyKind) -> AppResult<HashMap<i32, i32>> {
        let rows: Vec<(i32, Option<i32>)> = AttendanceEntity::find()
            .select_only()
            .column(AttendanceColumn::EntityId)
            .column_as(AttendanceColumn::Week.max(), "max_week")
            .filter(AttendanceColumn::EntityKind.eq(kind.as_str()))
            .group_by(AttendanceColumn::EntityId)
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(entity_id, week)| week.map(|week| (entity_id, week)))
            .collect())
    }

    /// 出席を提出する
    ///
    /// (entity_kind, entity_id, week) は一意。既存行があれば submitted_at を
    /// 更新し、後からの提出が先の提出を上書きする。
    pub async fn submit(
        &self,
        kind: HierarchyKind,
        entity_id: i32,
        week: i32,
    ) -> AppResult<Attendance> {
        let existing = AttendanceEntity::find()
            .filter(AttendanceColumn::EntityKind.eq(kind.as_str()))
            .filter(AttendanceColumn::EntityId.eq(entity_id))
            .filter(AttendanceColumn::Week.eq(week))
            .one(&self.db)
            .await?;

        if let Some(record) = existing {
            let mut model: AttendanceActiveModel = record.into();
            model.submitted_at = Set(Utc::now());
            return Ok(model.update(&self.db).await?);
        }

        let model = AttendanceActiveModel {
            entity_kind: Set(kind.as_str().to_string()),
            entity_id: Set(entity_id),
            week: Set(week),
            submitted_at: Set(Utc::now()),
            ..Default::default()
        };
        Ok(model.insert(&self.db).await?)
    }

    /// 指定ノードの出席レコードを全て削除する（ノード削除時）
    pub async fn delete_for(&self, kind: HierarchyKind, entity_id: i32) -> AppResult<u64> {
        let result = AttendanceEntity::delete_many()
            .filter(AttendanceColumn::EntityKind.eq(kind.as_str()))
            .filter(AttendanceColumn::EntityId.eq(entity_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }
}
