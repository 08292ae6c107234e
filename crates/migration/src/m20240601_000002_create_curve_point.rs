//! Create `curve_point` table.
//!
//! `curve_id` holds a single unsigned byte; the range is enforced by the DTO.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CurvePoint::Table)
                    .if_not_exists()
                    .col(pk_auto(CurvePoint::Id))
                    .col(small_integer(CurvePoint::CurveId))
                    .col(double_null(CurvePoint::Term))
                    .col(double_null(CurvePoint::CurvePointValue))
                    .col(timestamp_with_time_zone_null(CurvePoint::AsOfDate))
                    .col(timestamp_with_time_zone_null(CurvePoint::CreationDate))
                    .col(integer(CurvePoint::Version).default(1))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(CurvePoint::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum CurvePoint { Table, Id, CurveId, Term, CurvePointValue, AsOfDate, CreationDate, Version }
