use sea_orm_migration::prelude::*;

use crate::m20260101_000001_create_registry_tables::Investors;

/// Threshold listings filter on `investment`; index it.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_investors_investment")
                    .table(Investors::Table)
                    .col(Investors::Investment)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_investors_investment")
                    .table(Investors::Table)
                    .to_owned(),
            )
            .await
    }
}
