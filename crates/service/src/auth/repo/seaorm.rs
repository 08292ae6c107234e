use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, Set};
use uuid::Uuid;

use models::{role, user, user_credentials, user_role};

use crate::auth::domain::{AuthUser, Credentials};
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;

/// Auth persistence over any SeaORM connection, including an open transaction.
pub struct SeaOrmAuthRepository<'c, C: ConnectionTrait> {
    pub db: &'c C,
}

impl<'c, C: ConnectionTrait> SeaOrmAuthRepository<'c, C> {
    pub fn new(db: &'c C) -> Self { Self { db } }
}

fn to_auth_user(u: user::Model) -> AuthUser {
    AuthUser { id: u.id, user_name: u.user_name, full_name: u.full_name, email: u.email }
}

fn to_credentials(c: user_credentials::Model) -> Credentials {
    Credentials {
        user_id: c.user_id,
        password_hash: c.password_hash,
        password_algorithm: c.password_algorithm,
        access_failed_count: c.access_failed_count,
        lockout_end: c.lockout_end,
    }
}

#[async_trait::async_trait]
impl<'c, C: ConnectionTrait> AuthRepository for SeaOrmAuthRepository<'c, C> {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
        Ok(user::find_by_email(self.db, email).await?.map(to_auth_user))
    }

    async fn find_user_by_user_name(&self, user_name: &str) -> Result<Option<AuthUser>, AuthError> {
        Ok(user::find_by_user_name(self.db, user_name).await?.map(to_auth_user))
    }

    async fn create_user(&self, user_name: &str, full_name: Option<&str>, email: &str) -> Result<AuthUser, AuthError> {
        let created = user::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            user_name: Set(user_name.to_string()),
            full_name: Set(full_name.map(str::to_string)),
            email: Set(email.to_string()),
            version: Set(1),
        }
        .insert(self.db)
        .await?;
        Ok(to_auth_user(created))
    }

    async fn get_credentials(&self, user_id: &str) -> Result<Option<Credentials>, AuthError> {
        Ok(user_credentials::find_by_user(self.db, user_id).await?.map(to_credentials))
    }

    async fn upsert_password(&self, user_id: &str, password_hash: String, password_algorithm: String) -> Result<Credentials, AuthError> {
        let c = user_credentials::upsert_password(self.db, user_id, password_hash, &password_algorithm).await?;
        Ok(to_credentials(c))
    }

    async fn record_failed_login(&self, user_id: &str) -> Result<i32, AuthError> {
        user_credentials::increment_failures(self.db, user_id).await?.ok_or(AuthError::NotFound)
    }

    async fn record_login_attempt(&self, user_id: &str, access_failed_count: i32, lockout_end: Option<DateTime<Utc>>) -> Result<(), AuthError> {
        let creds = user_credentials::find_by_user(self.db, user_id).await?.ok_or(AuthError::NotFound)?;
        user_credentials::record_attempt(self.db, creds, access_failed_count, lockout_end).await?;
        Ok(())
    }

    async fn roles_of(&self, user_id: &str) -> Result<Vec<String>, AuthError> {
        use sea_orm::{ColumnTrait, QueryFilter, QueryOrder};
        let roles = role::Entity::find()
            .inner_join(user_role::Entity)
            .filter(user_role::Column::UserId.eq(user_id))
            .order_by_asc(role::Column::Name)
            .all(self.db)
            .await?;
        Ok(roles.into_iter().map(|r| r.name).collect())
    }

    async fn assign_role(&self, user_id: &str, role_name: &str) -> Result<(), AuthError> {
        let r = role::get_or_create(self.db, role_name).await?;
        let link = user_role::ActiveModel { user_id: Set(user_id.to_string()), role_id: Set(r.id) };
        user_role::Entity::insert(link).exec_without_returning(self.db).await?;
        Ok(())
    }
}
