use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use sea_orm::TransactionTrait;
use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;

use common::types::Message;
use service::user::{RoleDto, RoleNames, UserRepository};
use service::CrudRepository;

use crate::errors::ApiError;
use crate::extract::{JsonBody, PathId};
use crate::routes::auth::ServerState;

fn user_not_found() -> ApiError {
    ApiError::NotFound("User not found with the provided id.".into())
}

/// Names from a body that must name at least one role.
fn required_names(body: RoleNames) -> Result<Vec<String>, ApiError> {
    let names = body.into_vec();
    if names.is_empty() {
        return Err(ApiError::BadRequest("At least one role is required.".into()));
    }
    Ok(names)
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddRolesOutput {
    pub message: String,
    /// Requested roles the user already held.
    pub already_held: Vec<String>,
}

#[utoipa::path(get, path = "/users/{id}/roles", tag = "users", params(("id" = String, Path, description = "User id")), responses((status = 200, description = "Role names", body = [String]), (status = 404, description = "Not Found")), security(("bearer" = [])))]
pub async fn user_roles(State(state): State<ServerState>, PathId(id): PathId<String>) -> Result<Json<Vec<String>>, ApiError> {
    if !UserRepository::exists(&state.db, id.clone()).await? {
        return Err(user_not_found());
    }
    Ok(Json(UserRepository::roles_of(&state.db, &id).await?))
}

#[utoipa::path(post, path = "/users/{id}/roles", tag = "users", params(("id" = String, Path, description = "User id")), request_body = RoleNames, responses((status = 200, description = "Roles added", body = AddRolesOutput), (status = 400, description = "Unknown role"), (status = 404, description = "Not Found")), security(("bearer" = [])))]
pub async fn add_roles(State(state): State<ServerState>, PathId(id): PathId<String>, JsonBody(body): JsonBody<RoleNames>) -> Result<Json<AddRolesOutput>, ApiError> {
    let names = body.into_vec();
    let txn = state.db.begin().await?;
    let already_held = UserRepository::add_roles(&txn, &id, &names).await?.ok_or_else(user_not_found)?;
    txn.commit().await?;
    Ok(Json(AddRolesOutput { message: "Roles added to User successfully.".into(), already_held }))
}

#[utoipa::path(put, path = "/users/{id}/roles", tag = "users", params(("id" = String, Path, description = "User id")), request_body = RoleNames, responses((status = 200, description = "Roles replaced", body = crate::openapi::MessageResponse), (status = 400, description = "Unknown role"), (status = 404, description = "Not Found")), security(("bearer" = [])))]
pub async fn set_roles(State(state): State<ServerState>, PathId(id): PathId<String>, JsonBody(body): JsonBody<RoleNames>) -> Result<Json<Message>, ApiError> {
    let names = body.into_vec();
    let txn = state.db.begin().await?;
    if !UserRepository::set_roles(&txn, &id, &names).await? {
        return Err(user_not_found());
    }
    txn.commit().await?;
    Ok(Json(Message::new("Role updated for User successfully.")))
}

#[utoipa::path(delete, path = "/users/{id}/roles", tag = "users", params(("id" = String, Path, description = "User id")), request_body = RoleNames, responses((status = 200, description = "Role removed", body = crate::openapi::MessageResponse), (status = 400, description = "Empty role list"), (status = 404, description = "User or membership not found")), security(("bearer" = [])))]
pub async fn remove_role(State(state): State<ServerState>, PathId(id): PathId<String>, JsonBody(body): JsonBody<RoleNames>) -> Result<Json<Message>, ApiError> {
    let names = required_names(body)?;
    let txn = state.db.begin().await?;
    for name in names {
        if !UserRepository::remove_role(&txn, &id, &name).await? {
            return Err(ApiError::NotFound(format!("User not found or does not hold role '{name}'.")));
        }
    }
    txn.commit().await?;
    Ok(Json(Message::new("Role removed from User successfully.")))
}

#[utoipa::path(get, path = "/roles", tag = "roles", responses((status = 200, description = "All roles", body = [RoleDto])), security(("bearer" = [])))]
pub async fn list_roles(State(state): State<ServerState>) -> Result<Json<Vec<RoleDto>>, ApiError> {
    Ok(Json(UserRepository::list_roles(&state.db).await?))
}

#[utoipa::path(post, path = "/roles", tag = "roles", request_body = RoleNames, responses((status = 201, description = "Created", body = crate::openapi::MessageResponse), (status = 400, description = "Invalid name or empty role list"), (status = 409, description = "Role already exists")), security(("bearer" = [])))]
pub async fn create_role(State(state): State<ServerState>, JsonBody(body): JsonBody<RoleNames>) -> Result<(StatusCode, Json<Message>), ApiError> {
    let names = required_names(body)?;
    let txn = state.db.begin().await?;
    for name in names {
        if !UserRepository::create_role(&txn, &name).await? {
            return Err(ApiError::Conflict(format!("Role '{name}' already exists.")));
        }
    }
    txn.commit().await?;
    Ok((StatusCode::CREATED, Json(Message::new("Role created successfully."))))
}

#[utoipa::path(delete, path = "/roles/{name}", tag = "roles", params(("name" = String, Path, description = "Role name")), responses((status = 200, description = "Deleted", body = crate::openapi::MessageResponse), (status = 404, description = "Role not found")), security(("bearer" = [])))]
pub async fn delete_role(State(state): State<ServerState>, PathId(name): PathId<String>) -> Result<Json<Message>, ApiError> {
    let txn = state.db.begin().await?;
    if !UserRepository::delete_role(&txn, &name).await? {
        return Err(ApiError::NotFound("Role not found.".into()));
    }
    txn.commit().await?;
    info!(role = %name, "role removed via api");
    Ok(Json(Message::new("Role deleted successfully.")))
}
