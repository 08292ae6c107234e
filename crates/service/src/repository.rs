//! Generic CRUD contract shared by every reference-data entity.
//!
//! Repositories are stateless: each call receives the connection (or open
//! transaction) it should run on, so the HTTP layer decides the unit of work.

use std::fmt::Display;

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Value};
use serde::{de::DeserializeOwned, Serialize};

use crate::errors::ServiceError;

#[async_trait]
pub trait CrudRepository: Send + Sync + 'static {
    type Id: Clone + PartialEq + Display + DeserializeOwned + Send + Sync + 'static;
    type Dto: Serialize + DeserializeOwned + validator::Validate + Send + Sync + 'static;

    /// Display name used in log lines and error messages.
    const ENTITY: &'static str;

    /// Id carried in the body, if any.
    fn dto_id(dto: &Self::Dto) -> Option<Self::Id>;

    async fn list<C: ConnectionTrait>(conn: &C) -> Result<Vec<Self::Dto>, ServiceError>;

    async fn get<C: ConnectionTrait>(conn: &C, id: Self::Id) -> Result<Option<Self::Dto>, ServiceError>;

    async fn create<C: ConnectionTrait>(conn: &C, dto: Self::Dto) -> Result<Self::Dto, ServiceError>;

    /// `Ok(None)` when no row has this id.
    async fn update<C: ConnectionTrait>(conn: &C, id: Self::Id, dto: Self::Dto) -> Result<Option<Self::Dto>, ServiceError>;

    async fn delete<C: ConnectionTrait>(conn: &C, id: Self::Id) -> Result<bool, ServiceError>;

    async fn exists<C: ConnectionTrait>(conn: &C, id: Self::Id) -> Result<bool, ServiceError>;
}

/// Write `am` to the row matching `id` only if its version is still `read_version`,
/// bumping the version in the same statement.
///
/// Returns `Ok(false)` when the row vanished, and `ServiceError::Conflict` when it
/// exists under a newer version.
pub(crate) async fn write_versioned<E, C>(
    conn: &C,
    entity: &str,
    id_col: E::Column,
    id: impl Into<Value> + Send,
    version_col: E::Column,
    read_version: i32,
    am: E::ActiveModel,
) -> Result<bool, ServiceError>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    let id: Value = id.into();
    let res = E::update_many()
        .set(am)
        .col_expr(version_col, Expr::col(version_col).add(1))
        .filter(id_col.eq(id.clone()))
        .filter(version_col.eq(read_version))
        .exec(conn)
        .await?;
    if res.rows_affected > 0 {
        return Ok(true);
    }
    let still_there = E::find().filter(id_col.eq(id)).one(conn).await?.is_some();
    if still_there {
        tracing::warn!(entity, read_version, "stale version on update");
        Err(ServiceError::stale(entity))
    } else {
        Ok(false)
    }
}
