//! Create `trade` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Trade::Table)
                    .if_not_exists()
                    .col(pk_auto(Trade::Id))
                    .col(string_len(Trade::Account, 50))
                    .col(string_len(Trade::AccountType, 50))
                    .col(double_null(Trade::BuyQuantity))
                    .col(double_null(Trade::SellQuantity))
                    .col(double_null(Trade::BuyPrice))
                    .col(double_null(Trade::SellPrice))
                    .col(timestamp_with_time_zone_null(Trade::TradeDate))
                    .col(string_len_null(Trade::TradeSecurity, 100))
                    .col(string_len_null(Trade::TradeStatus, 50))
                    .col(string_len_null(Trade::Trader, 50))
                    .col(string_len_null(Trade::Benchmark, 50))
                    .col(string_len_null(Trade::Book, 50))
                    .col(string_len_null(Trade::CreationName, 50))
                    .col(timestamp_with_time_zone_null(Trade::CreationDate))
                    .col(string_len_null(Trade::RevisionName, 50))
                    .col(timestamp_with_time_zone_null(Trade::RevisionDate))
                    .col(string_len_null(Trade::DealName, 50))
                    .col(integer(Trade::Version).default(1))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Trade::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Trade {
    Table,
    Id,
    Account,
    AccountType,
    BuyQuantity,
    SellQuantity,
    BuyPrice,
    SellPrice,
    TradeDate,
    TradeSecurity,
    TradeStatus,
    Trader,
    Benchmark,
    Book,
    CreationName,
    CreationDate,
    RevisionName,
    RevisionDate,
    DealName,
    Version,
}
