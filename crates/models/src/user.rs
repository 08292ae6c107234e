use sea_orm::{entity::prelude::*, ConnectionTrait, QueryFilter};
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::{role, user_role};

/// Characters accepted in a user name.
pub const USER_NAME_CHARS: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789-._@";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "app_user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub user_name: String,
    pub full_name: Option<String>,
    #[sea_orm(unique)]
    pub email: String,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    UserRole,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::UserRole => Entity::has_many(user_role::Entity).into(),
        }
    }
}

impl Related<user_role::Entity> for Entity {
    fn to() -> RelationDef { Relation::UserRole.def() }
}

impl Related<role::Entity> for Entity {
    fn to() -> RelationDef { user_role::Relation::Role.def() }
    fn via() -> Option<RelationDef> { Some(user_role::Relation::User.def().rev()) }
}

impl ActiveModelBehavior for ActiveModel {}

pub const INVALID_EMAIL: &str = "Email must be a valid email address.";

pub fn validate_email(email: &str) -> Result<(), errors::ModelError> {
    let trimmed = email.trim();
    let Some((local, domain)) = trimmed.split_once('@') else {
        return Err(errors::ModelError::Validation(INVALID_EMAIL.into()));
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') || !domain.contains('.') {
        return Err(errors::ModelError::Validation(INVALID_EMAIL.into()));
    }
    if trimmed.len() > 255 {
        return Err(errors::ModelError::Validation("email cannot exceed 255 characters".into()));
    }
    Ok(())
}

pub fn validate_user_name(name: &str) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() {
        return Err(errors::ModelError::Validation("user name required".into()));
    }
    if name.chars().count() > 50 {
        return Err(errors::ModelError::Validation("user name cannot exceed 50 characters".into()));
    }
    if let Some(bad) = name.chars().find(|c| !USER_NAME_CHARS.contains(*c)) {
        return Err(errors::ModelError::Validation(format!("user name contains invalid character '{bad}'")));
    }
    Ok(())
}

pub async fn find_by_email<C: ConnectionTrait>(db: &C, email: &str) -> Result<Option<Model>, errors::ModelError> {
    Ok(Entity::find().filter(Column::Email.eq(email.trim())).one(db).await?)
}

pub async fn find_by_user_name<C: ConnectionTrait>(db: &C, user_name: &str) -> Result<Option<Model>, errors::ModelError> {
    Ok(Entity::find().filter(Column::UserName.eq(user_name)).one(db).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_requires_local_and_dotted_domain() {
        assert!(validate_email("a@b.com").is_ok());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@b.com").is_err());
        assert!(validate_email("a@localhost").is_err());
        assert!(validate_email("a@b@c.com").is_err());
    }

    #[test]
    fn user_name_charset_is_enforced() {
        assert!(validate_user_name("jane.doe-01@desk").is_ok());
        assert!(validate_user_name("").is_err());
        assert!(validate_user_name("jane doe").is_err());
        assert!(validate_user_name(&"x".repeat(51)).is_err());
    }
}
