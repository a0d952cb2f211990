use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string(Users::Username).unique_key())
                    .col(string(Users::Password))
                    .to_owned(),
            )
            .await?;

        // Create investors table
        manager
            .create_table(
                Table::create()
                    .table(Investors::Table)
                    .if_not_exists()
                    .col(pk_auto(Investors::Id))
                    .col(string(Investors::Name))
                    .col(string(Investors::Surname))
                    .col(decimal(Investors::Investment).decimal_len(15, 2))
                    .col(integer_null(Investors::RegisteredById))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_investor_registered_by")
                            .from(Investors::Table, Investors::RegisteredById)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order to avoid foreign key constraints
        manager
            .drop_table(Table::drop().table(Investors::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum Users {
    Table,
    Id,
    Username,
    Password,
}

#[derive(DeriveIden)]
pub(crate) enum Investors {
    Table,
    Id,
    Name,
    Surname,
    Investment,
    RegisteredById,
}
