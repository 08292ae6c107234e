//! Create `rule_name` table for business rules.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RuleName::Table)
                    .if_not_exists()
                    .col(pk_auto(RuleName::Id))
                    .col(string_len(RuleName::Name, 100))
                    .col(string_len_null(RuleName::Description, 500))
                    .col(text(RuleName::Json))
                    .col(text(RuleName::Template))
                    .col(text(RuleName::SqlStr))
                    .col(text(RuleName::SqlPart))
                    .col(integer(RuleName::Version).default(1))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(RuleName::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum RuleName { Table, Id, Name, Description, Json, Template, SqlStr, SqlPart, Version }
