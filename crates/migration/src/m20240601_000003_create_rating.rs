//! Create `rating` table (Moody's / S&P / Fitch triple).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Rating::Table)
                    .if_not_exists()
                    .col(pk_auto(Rating::Id))
                    .col(string_len(Rating::MoodysRating, 50))
                    .col(string_len(Rating::SandPRating, 50))
                    .col(string_len(Rating::FitchRating, 50))
                    .col(small_integer_null(Rating::OrderNumber))
                    .col(integer(Rating::Version).default(1))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Rating::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Rating { Table, Id, MoodysRating, SandPRating, FitchRating, OrderNumber, Version }
