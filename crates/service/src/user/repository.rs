use std::collections::BTreeSet;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use models::{role, user, user_credentials, user_role};

use super::dto::{RoleDto, UserDto};
use crate::auth::errors::AuthError;
use crate::auth::password;
use crate::errors::ServiceError;
use crate::repository::{write_versioned, CrudRepository};

pub struct UserRepository;

fn password_error(e: AuthError) -> ServiceError {
    match e {
        AuthError::Validation(msg) => ServiceError::Validation(msg),
        other => ServiceError::Db(other.to_string()),
    }
}

fn to_dto(u: user::Model, mut roles: Vec<String>) -> UserDto {
    roles.sort();
    UserDto {
        id: Some(u.id),
        user_name: u.user_name,
        password: None,
        full_name: u.full_name,
        email: u.email,
        roles,
    }
}

impl UserRepository {
    fn check(dto: &UserDto) -> Result<(), ServiceError> {
        dto.validate()?;
        user::validate_user_name(&dto.user_name)?;
        user::validate_email(&dto.email)?;
        Ok(())
    }

    async fn store_password<C: ConnectionTrait>(conn: &C, user_id: &str, plain: &str) -> Result<(), ServiceError> {
        password::check_policy(plain).map_err(password_error)?;
        let hash = password::hash_password(plain).map_err(password_error)?;
        user_credentials::upsert_password(conn, user_id, hash, password::PASSWORD_ALGORITHM).await?;
        Ok(())
    }

    /// Look up every requested role, failing with the names that do not exist.
    async fn resolve_roles<C: ConnectionTrait>(conn: &C, names: &[String]) -> Result<Vec<role::Model>, ServiceError> {
        let wanted: BTreeSet<&str> = names.iter().map(String::as_str).collect();
        let unique: Vec<String> = wanted.iter().map(|s| s.to_string()).collect();
        let found = role::find_by_names(conn, &unique).await?;
        if found.len() != unique.len() {
            let known: BTreeSet<&str> = found.iter().map(|r| r.name.as_str()).collect();
            let unknown: Vec<&str> = wanted.difference(&known).copied().collect();
            return Err(ServiceError::Validation(format!("Unknown role(s): {}", unknown.join(", "))));
        }
        Ok(found)
    }

    async fn replace_roles<C: ConnectionTrait>(conn: &C, user_id: &str, roles: &[role::Model]) -> Result<(), ServiceError> {
        user_role::Entity::delete_many()
            .filter(user_role::Column::UserId.eq(user_id))
            .exec(conn)
            .await?;
        if roles.is_empty() {
            return Ok(());
        }
        let rows = roles.iter().map(|r| user_role::ActiveModel { user_id: Set(user_id.to_string()), role_id: Set(r.id) });
        user_role::Entity::insert_many(rows).exec_without_returning(conn).await?;
        Ok(())
    }

    /// Role names held by the user, sorted.
    pub async fn roles_of<C: ConnectionTrait>(conn: &C, user_id: &str) -> Result<Vec<String>, ServiceError> {
        let roles = role::Entity::find()
            .inner_join(user_role::Entity)
            .filter(user_role::Column::UserId.eq(user_id))
            .order_by_asc(role::Column::Name)
            .all(conn)
            .await?;
        Ok(roles.into_iter().map(|r| r.name).collect())
    }

    /// Grant roles to a user. Returns the requested roles the user already held,
    /// or `None` when the user does not exist.
    pub async fn add_roles<C: ConnectionTrait>(conn: &C, user_id: &str, names: &[String]) -> Result<Option<Vec<String>>, ServiceError> {
        if user::Entity::find_by_id(user_id).one(conn).await?.is_none() {
            return Ok(None);
        }
        if names.is_empty() {
            return Err(ServiceError::Validation("At least one role is required.".into()));
        }
        let requested = Self::resolve_roles(conn, names).await?;
        let held = Self::roles_of(conn, user_id).await?;

        let mut already = Vec::new();
        let mut rows = Vec::new();
        for r in requested {
            if held.contains(&r.name) {
                already.push(r.name);
            } else {
                rows.push(user_role::ActiveModel { user_id: Set(user_id.to_string()), role_id: Set(r.id) });
            }
        }
        if !rows.is_empty() {
            info!(user_id, added = rows.len(), "roles granted");
            user_role::Entity::insert_many(rows).exec_without_returning(conn).await?;
        }
        Ok(Some(already))
    }

    /// `false` when the user is missing or does not hold the role.
    pub async fn remove_role<C: ConnectionTrait>(conn: &C, user_id: &str, name: &str) -> Result<bool, ServiceError> {
        let Some(r) = role::find_by_name(conn, name).await? else {
            return Ok(false);
        };
        let res = user_role::Entity::delete_many()
            .filter(user_role::Column::UserId.eq(user_id))
            .filter(user_role::Column::RoleId.eq(r.id))
            .exec(conn)
            .await?;
        Ok(res.rows_affected > 0)
    }

    pub async fn set_roles<C: ConnectionTrait>(conn: &C, user_id: &str, names: &[String]) -> Result<bool, ServiceError> {
        if user::Entity::find_by_id(user_id).one(conn).await?.is_none() {
            return Ok(false);
        }
        let roles = Self::resolve_roles(conn, names).await?;
        Self::replace_roles(conn, user_id, &roles).await?;
        info!(user_id, count = roles.len(), "roles replaced");
        Ok(true)
    }

    pub async fn list_roles<C: ConnectionTrait>(conn: &C) -> Result<Vec<RoleDto>, ServiceError> {
        let roles = role::Entity::find().order_by_asc(role::Column::Name).all(conn).await?;
        Ok(roles.into_iter().map(|r| RoleDto { id: r.id, name: r.name }).collect())
    }

    /// `false` when a role with this name already exists.
    pub async fn create_role<C: ConnectionTrait>(conn: &C, name: &str) -> Result<bool, ServiceError> {
        role::validate_role_name(name)?;
        if role::find_by_name(conn, name).await?.is_some() {
            return Ok(false);
        }
        role::ActiveModel { id: NotSet, name: Set(name.to_string()) }.insert(conn).await?;
        info!(role = name, "role created");
        Ok(true)
    }

    /// Drop a role and every membership that references it.
    pub async fn delete_role<C: ConnectionTrait>(conn: &C, name: &str) -> Result<bool, ServiceError> {
        let Some(r) = role::find_by_name(conn, name).await? else {
            return Ok(false);
        };
        user_role::Entity::delete_many()
            .filter(user_role::Column::RoleId.eq(r.id))
            .exec(conn)
            .await?;
        r.delete(conn).await?;
        info!(role = name, "role deleted");
        Ok(true)
    }
}

#[async_trait]
impl CrudRepository for UserRepository {
    type Id = String;
    type Dto = UserDto;
    const ENTITY: &'static str = "User";

    fn dto_id(dto: &UserDto) -> Option<String> { dto.id.clone() }

    async fn list<C: ConnectionTrait>(conn: &C) -> Result<Vec<UserDto>, ServiceError> {
        let rows = user::Entity::find()
            .order_by_asc(user::Column::Id)
            .find_with_related(role::Entity)
            .all(conn)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(u, roles)| to_dto(u, roles.into_iter().map(|r| r.name).collect()))
            .collect())
    }

    async fn get<C: ConnectionTrait>(conn: &C, id: String) -> Result<Option<UserDto>, ServiceError> {
        let Some(u) = user::Entity::find_by_id(id.as_str()).one(conn).await? else {
            return Ok(None);
        };
        let roles = Self::roles_of(conn, &u.id).await?;
        Ok(Some(to_dto(u, roles)))
    }

    async fn create<C: ConnectionTrait>(conn: &C, dto: UserDto) -> Result<UserDto, ServiceError> {
        Self::check(&dto)?;
        let plain = dto
            .password
            .as_deref()
            .ok_or_else(|| ServiceError::Validation("Password is required.".into()))?;
        if user::find_by_email(conn, &dto.email).await?.is_some() {
            return Err(ServiceError::Conflict(format!("Email '{}' is already taken.", dto.email.trim())));
        }
        if user::find_by_user_name(conn, &dto.user_name).await?.is_some() {
            return Err(ServiceError::Conflict(format!("UserName '{}' is already taken.", dto.user_name)));
        }
        let roles = Self::resolve_roles(conn, &dto.roles).await?;

        let created = user::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            user_name: Set(dto.user_name.clone()),
            full_name: Set(dto.full_name.clone()),
            email: Set(dto.email.trim().to_string()),
            version: Set(1),
        }
        .insert(conn)
        .await?;
        Self::store_password(conn, &created.id, plain).await?;
        Self::replace_roles(conn, &created.id, &roles).await?;
        info!(user_id = %created.id, user_name = %created.user_name, "user created");
        Ok(to_dto(created, roles.into_iter().map(|r| r.name).collect()))
    }

    async fn update<C: ConnectionTrait>(conn: &C, id: String, dto: UserDto) -> Result<Option<UserDto>, ServiceError> {
        Self::check(&dto)?;
        let Some(current) = user::Entity::find_by_id(id.as_str()).one(conn).await? else {
            return Ok(None);
        };
        let roles = Self::resolve_roles(conn, &dto.roles).await?;
        let am = user::ActiveModel {
            id: NotSet,
            user_name: Set(dto.user_name),
            full_name: Set(dto.full_name),
            email: Set(dto.email.trim().to_string()),
            version: NotSet,
        };
        let written = write_versioned::<user::Entity, _>(
            conn,
            Self::ENTITY,
            user::Column::Id,
            id.clone(),
            user::Column::Version,
            current.version,
            am,
        )
        .await?;
        if !written {
            return Ok(None);
        }
        Self::replace_roles(conn, &id, &roles).await?;
        if let Some(plain) = dto.password.as_deref() {
            debug!(user_id = %id, "password replaced");
            Self::store_password(conn, &id, plain).await?;
        }
        Self::get(conn, id).await
    }

    async fn delete<C: ConnectionTrait>(conn: &C, id: String) -> Result<bool, ServiceError> {
        user_role::Entity::delete_many()
            .filter(user_role::Column::UserId.eq(id.as_str()))
            .exec(conn)
            .await?;
        user_credentials::Entity::delete_many()
            .filter(user_credentials::Column::UserId.eq(id.as_str()))
            .exec(conn)
            .await?;
        let res = user::Entity::delete_by_id(id.as_str()).exec(conn).await?;
        if res.rows_affected > 0 {
            info!(user_id = %id, "user deleted");
        }
        Ok(res.rows_affected > 0)
    }

    async fn exists<C: ConnectionTrait>(conn: &C, id: String) -> Result<bool, ServiceError> {
        Ok(user::Entity::find_by_id(id.as_str()).one(conn).await?.is_some())
    }
}
