//! Create `user_credentials` table storing password hashes and lockout state.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserCredentials::Table)
                    .if_not_exists()
                    .col(string_len(UserCredentials::Id, 36).primary_key())
                    .col(string_len_uniq(UserCredentials::UserId, 36))
                    .col(string_len(UserCredentials::PasswordHash, 255))
                    .col(string_len(UserCredentials::PasswordAlgorithm, 64))
                    .col(integer(UserCredentials::AccessFailedCount).default(0))
                    .col(timestamp_with_time_zone_null(UserCredentials::LockoutEnd))
                    .col(timestamp_with_time_zone(UserCredentials::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_credentials_user")
                            .from(UserCredentials::Table, UserCredentials::UserId)
                            .to(AppUser::Table, AppUser::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserCredentials::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum UserCredentials {
    Table,
    Id,
    UserId,
    PasswordHash,
    PasswordAlgorithm,
    AccessFailedCount,
    LockoutEnd,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum AppUser { Table, Id }
