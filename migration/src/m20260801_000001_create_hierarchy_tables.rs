use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // states テーブル作成（階層の根）
        manager
            .create_table(
                Table::create()
                    .table(States::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(States::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(States::Name).string_len(100).not_null())
                    .col(
                        ColumnDef::new(States::Code)
                            .string_len(20)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(States::Leader).string_len(100).null())
                    .to_owned(),
            )
            .await?;

        // regions テーブル作成
        manager
            .create_table(
                Table::create()
                    .table(Regions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Regions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Regions::Name).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Regions::Code)
                            .string_len(20)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Regions::Leader).string_len(100).null())
                    .col(ColumnDef::new(Regions::StateId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_regions_state_id")
                            .from(Regions::Table, Regions::StateId)
                            .to(States::Table, States::Id)
                            // 子が残っている親の削除は拒否する
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // districts テーブル作成（祖先キーは非正規化）
        manager
            .create_table(
                Table::create()
                    .table(Districts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Districts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Districts::Name).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Districts::Code)
                            .string_len(20)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Districts::Leader).string_len(100).null())
                    .col(ColumnDef::new(Districts::StateId).integer().not_null())
                    .col(ColumnDef::new(Districts::RegionId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_districts_state_id")
                            .from(Districts::Table, Districts::StateId)
                            .to(States::Table, States::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_districts_region_id")
                            .from(Districts::Table, Districts::RegionId)
                            .to(Regions::Table, Regions::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // groups テーブル作成
        manager
            .create_table(
                Table::create()
                    .table(Groups::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Groups::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Groups::Name).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Groups::Code)
                            .string_len(20)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Groups::Leader).string_len(100).null())
                    .col(ColumnDef::new(Groups::StateId).integer().not_null())
                    .col(ColumnDef::new(Groups::RegionId).integer().not_null())
                    .col(ColumnDef::new(Groups::DistrictId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_groups_state_id")
                            .from(Groups::Table, Groups::StateId)
                            .to(States::Table, States::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_groups_region_id")
                            .from(Groups::Table, Groups::RegionId)
                            .to(Regions::Table, Regions::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_groups_district_id")
                            .from(Groups::Table, Groups::DistrictId)
                            .to(Districts::Table, Districts::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // old_groups テーブル作成（最深ノード）
        manager
            .create_table(
                Table::create()
                    .table(OldGroups::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OldGroups::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OldGroups::Name).string_len(100).not_null())
                    .col(
                        ColumnDef::new(OldGroups::Code)
                            .string_len(20)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(OldGroups::Leader).string_len(100).null())
                    .col(ColumnDef::new(OldGroups::StateId).integer().not_null())
                    .col(ColumnDef::new(OldGroups::RegionId).integer().not_null())
                    .col(ColumnDef::new(OldGroups::DistrictId).integer().not_null())
                    .col(ColumnDef::new(OldGroups::GroupId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_old_groups_state_id")
                            .from(OldGroups::Table, OldGroups::StateId)
                            .to(States::Table, States::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_old_groups_region_id")
                            .from(OldGroups::Table, OldGroups::RegionId)
                            .to(Regions::Table, Regions::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_old_groups_district_id")
                            .from(OldGroups::Table, OldGroups::DistrictId)
                            .to(Districts::Table, Districts::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_old_groups_group_id")
                            .from(OldGroups::Table, OldGroups::GroupId)
                            .to(Groups::Table, Groups::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // スコープフィルタで使う外部キーのインデックス
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_regions_state_id")
                    .table(Regions::Table)
                    .col(Regions::StateId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_districts_region_id")
                    .table(Districts::Table)
                    .col(Districts::RegionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_groups_district_id")
                    .table(Groups::Table)
                    .col(Groups::DistrictId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_old_groups_group_id")
                    .table(OldGroups::Table)
                    .col(OldGroups::GroupId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 依存の深い順に削除
        manager
            .drop_table(Table::drop().table(OldGroups::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Groups::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Districts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Regions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(States::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum States {
    Table,
    Id,
    Name,
    Code,
    Leader,
}

#[derive(Iden)]
enum Regions {
    Table,
    Id,
    Name,
    Code,
    Leader,
    StateId,
}

#[derive(Iden)]
enum Districts {
    Table,
    Id,
    Name,
    Code,
    Leader,
    StateId,
    RegionId,
}

#[derive(Iden)]
enum Groups {
    Table,
    Id,
    Name,
    Code,
    Leader,
    StateId,
    RegionId,
    DistrictId,
}

#[derive(Iden)]
enum OldGroups {
    Table,
    Id,
    Name,
    Code,
    Leader,
    StateId,
    RegionId,
    DistrictId,
    GroupId,
}
