use sea_orm::{entity::prelude::*, ConnectionTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::{errors, user_role};

/// Role granted to every self-registered account.
pub const DEFAULT_ROLE: &str = "User";
/// Role required by mutation endpoints.
pub const ADMIN_ROLE: &str = "Admin";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "role")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
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

impl ActiveModelBehavior for ActiveModel {}

/// Role names are case-sensitive; only emptiness and length are checked.
pub fn validate_role_name(name: &str) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() {
        return Err(errors::ModelError::Validation("role name required".into()));
    }
    if name.chars().count() > 50 {
        return Err(errors::ModelError::Validation("role name cannot exceed 50 characters".into()));
    }
    Ok(())
}

pub async fn find_by_name<C: ConnectionTrait>(db: &C, name: &str) -> Result<Option<Model>, errors::ModelError> {
    Ok(Entity::find().filter(Column::Name.eq(name)).one(db).await?)
}

pub async fn find_by_names<C: ConnectionTrait>(db: &C, names: &[String]) -> Result<Vec<Model>, errors::ModelError> {
    if names.is_empty() {
        return Ok(Vec::new());
    }
    Ok(Entity::find()
        .filter(Column::Name.is_in(names.iter().cloned()))
        .order_by_asc(Column::Name)
        .all(db)
        .await?)
}

/// Fetch a role by name, inserting it when missing.
pub async fn get_or_create<C: ConnectionTrait>(db: &C, name: &str) -> Result<Model, errors::ModelError> {
    validate_role_name(name)?;
    if let Some(found) = find_by_name(db, name).await? {
        return Ok(found);
    }
    let am = ActiveModel { name: Set(name.to_string()), ..Default::default() };
    Ok(am.insert(db).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_name_rules() {
        assert!(validate_role_name("Admin").is_ok());
        assert!(validate_role_name("   ").is_err());
        assert!(validate_role_name(&"r".repeat(51)).is_err());
    }
}
