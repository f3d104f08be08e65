// migration/src/lib.rs
pub use sea_orm_migration::prelude::*;

// マイグレーションモジュール
mod m20260801_000001_create_hierarchy_tables;
mod m20260801_000002_create_users_table;
mod m20260801_000003_create_roles_tables;
mod m20260801_000004_create_attendance_records_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            // 1. 階層テーブル（states → old_groups の順に依存）
            Box::new(m20260801_000001_create_hierarchy_tables::Migration),
            // 2. ユーザーテーブル（階層テーブルへの外部キーを持つ）
            Box::new(m20260801_000002_create_users_table::Migration),
            // 3. ロールと割り当てテーブル、既定ロールの投入
            Box::new(m20260801_000003_create_roles_tables::Migration),
            // 4. 出席レコード
            Box::new(m20260801_000004_create_attendance_records_table::Migration),
        ]
    }
}
