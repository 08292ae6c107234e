//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240601_000001_create_bid_list;
mod m20240601_000002_create_curve_point;
mod m20240601_000003_create_rating;
mod m20240601_000004_create_rule_name;
mod m20240601_000005_create_trade;
mod m20240601_000006_create_app_user;
mod m20240601_000007_create_role;
mod m20240601_000008_create_user_role;
mod m20240601_000009_create_user_credentials;
mod m20240601_000010_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_bid_list::Migration),
            Box::new(m20240601_000002_create_curve_point::Migration),
            Box::new(m20240601_000003_create_rating::Migration),
            Box::new(m20240601_000004_create_rule_name::Migration),
            Box::new(m20240601_000005_create_trade::Migration),
            Box::new(m20240601_000006_create_app_user::Migration),
            Box::new(m20240601_000007_create_role::Migration),
            // membership and credentials reference app_user/role
            Box::new(m20240601_000008_create_user_role::Migration),
            Box::new(m20240601_000009_create_user_credentials::Migration),
            // Indexes should always be applied last
            Box::new(m20240601_000010_add_indexes::Migration),
        ]
    }
}
