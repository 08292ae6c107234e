use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Membership lookups by role (role deletion, "who is Admin")
        manager
            .create_index(
                Index::create()
                    .name("idx_user_role_role")
                    .table(UserRole::Table)
                    .col(UserRole::RoleId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_trade_account")
                    .table(Trade::Table)
                    .col(Trade::Account)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_curve_point_curve")
                    .table(CurvePoint::Table)
                    .col(CurvePoint::CurveId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_user_role_role").table(UserRole::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_trade_account").table(Trade::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_curve_point_curve").table(CurvePoint::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum UserRole { Table, RoleId }

#[derive(DeriveIden)]
enum Trade { Table, Account }

#[derive(DeriveIden)]
enum CurvePoint { Table, CurveId }
