//! Create `bid_list` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BidList::Table)
                    .if_not_exists()
                    .col(pk_auto(BidList::Id))
                    .col(string_len(BidList::Account, 50))
                    .col(string_len(BidList::BidType, 50))
                    .col(double_null(BidList::BidQuantity))
                    .col(integer(BidList::Version).default(1))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(BidList::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum BidList { Table, Id, Account, BidType, BidQuantity, Version }
