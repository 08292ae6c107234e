use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::user;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_credentials")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub user_id: String,
    pub password_hash: String,
    pub password_algorithm: String,
    pub access_failed_count: i32,
    pub lockout_end: Option<DateTimeUtc>,
    pub updated_at: DateTimeUtc,
}

impl Model {
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        matches!(self.lockout_end, Some(end) if end > now)
    }
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { User }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef { Relation::User.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn find_by_user<C: ConnectionTrait>(db: &C, user_id: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find().filter(Column::UserId.eq(user_id)).one(db).await?)
}

/// Store a new hash for the user, clearing any failure count and lockout.
pub async fn upsert_password<C: ConnectionTrait>(
    db: &C,
    user_id: &str,
    password_hash: String,
    algorithm: &str,
) -> Result<Model, ModelError> {
    if password_hash.trim().is_empty() {
        return Err(ModelError::Validation("password hash required".into()));
    }
    let now = Utc::now();
    match find_by_user(db, user_id).await? {
        Some(existing) => {
            let mut am: ActiveModel = existing.into();
            am.password_hash = Set(password_hash);
            am.password_algorithm = Set(algorithm.to_string());
            am.access_failed_count = Set(0);
            am.lockout_end = Set(None);
            am.updated_at = Set(now);
            Ok(am.update(db).await?)
        }
        None => {
            let am = ActiveModel {
                id: Set(Uuid::new_v4().to_string()),
                user_id: Set(user_id.to_string()),
                password_hash: Set(password_hash),
                password_algorithm: Set(algorithm.to_string()),
                access_failed_count: Set(0),
                lockout_end: Set(None),
                updated_at: Set(now),
            };
            Ok(am.insert(db).await?)
        }
    }
}

/// Bump the failure counter in the store and return its new value, or `None`
/// when the user has no credentials. The increment happens in SQL so
/// concurrent failures are all counted.
pub async fn increment_failures<C: ConnectionTrait>(db: &C, user_id: &str) -> Result<Option<i32>, ModelError> {
    Entity::update_many()
        .col_expr(Column::AccessFailedCount, Expr::col(Column::AccessFailedCount).add(1))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    Ok(find_by_user(db, user_id).await?.map(|c| c.access_failed_count))
}

/// Persist the outcome of a login attempt.
pub async fn record_attempt<C: ConnectionTrait>(
    db: &C,
    creds: Model,
    access_failed_count: i32,
    lockout_end: Option<DateTime<Utc>>,
) -> Result<Model, ModelError> {
    let mut am: ActiveModel = creds.into();
    am.access_failed_count = Set(access_failed_count);
    am.lockout_end = Set(lockout_end);
    am.updated_at = Set(Utc::now());
    Ok(am.update(db).await?)
}
