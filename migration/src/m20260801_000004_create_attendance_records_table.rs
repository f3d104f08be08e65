use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // attendance_records テーブル作成
        // ノードは (entity_kind, entity_id) ペアで参照する追記専用テーブル
        manager
            .create_table(
                Table::create()
                    .table(AttendanceRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AttendanceRecords::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AttendanceRecords::EntityKind)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceRecords::EntityId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AttendanceRecords::Week).integer().not_null())
                    .col(
                        ColumnDef::new(AttendanceRecords::SubmittedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // (entity_kind, entity_id, week) は一意。後からの提出が上書きする
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_attendance_records_entity_week")
                    .table(AttendanceRecords::Table)
                    .col(AttendanceRecords::EntityKind)
                    .col(AttendanceRecords::EntityId)
                    .col(AttendanceRecords::Week)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 最終提出週の MAX / GROUP BY を支えるインデックス
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_attendance_records_entity")
                    .table(AttendanceRecords::Table)
                    .col(AttendanceRecords::EntityKind)
                    .col(AttendanceRecords::EntityId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .if_exists()
                    .name("idx_attendance_records_entity")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .if_exists()
                    .name("idx_attendance_records_entity_week")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(AttendanceRecords::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum AttendanceRecords {
    Table,
    Id,
    EntityKind,
    EntityId,
    Week,
    SubmittedAt,
}
