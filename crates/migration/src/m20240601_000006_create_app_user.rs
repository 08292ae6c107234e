//! Create `app_user` table.
//!
//! Ids are UUID v4 strings generated by the application. Passwords live in
//! `user_credentials`, role membership in `user_role`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AppUser::Table)
                    .if_not_exists()
                    .col(string_len(AppUser::Id, 36).primary_key())
                    .col(string_len_uniq(AppUser::UserName, 50))
                    .col(string_len_null(AppUser::FullName, 100))
                    .col(string_len_uniq(AppUser::Email, 255))
                    .col(integer(AppUser::Version).default(1))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(AppUser::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum AppUser { Table, Id, UserName, FullName, Email, Version }
