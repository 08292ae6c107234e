//! Handlers shared by every reference-data resource, parameterised by repository.

use axum::{
    extract::{OriginalUri, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use sea_orm::TransactionTrait;
use tracing::info;

use common::types::Message;
use service::CrudRepository;

use crate::errors::ApiError;
use crate::extract::{PathId, ValidJson};
use crate::routes::auth::ServerState;

pub const ID_MISMATCH: &str = "The provided id does not match the id in the request.";

fn not_found<R: CrudRepository>() -> ApiError {
    ApiError::NotFound(format!("{} not found with the provided id.", R::ENTITY))
}

pub async fn list<R: CrudRepository>(State(state): State<ServerState>) -> Result<Json<Vec<R::Dto>>, ApiError> {
    Ok(Json(R::list(&state.db).await?))
}

pub async fn get<R: CrudRepository>(State(state): State<ServerState>, PathId(id): PathId<R::Id>) -> Result<Json<R::Dto>, ApiError> {
    R::get(&state.db, id).await?.map(Json).ok_or_else(not_found::<R>)
}

pub async fn create<R: CrudRepository>(
    State(state): State<ServerState>,
    OriginalUri(uri): OriginalUri,
    ValidJson(dto): ValidJson<R::Dto>,
) -> Result<impl IntoResponse, ApiError> {
    let txn = state.db.begin().await?;
    let created = R::create(&txn, dto).await?;
    txn.commit().await?;

    let id = R::dto_id(&created).ok_or_else(|| ApiError::Internal(format!("{} created without id", R::ENTITY)))?;
    let location = format!("{}/{}", uri.path().trim_end_matches('/'), id);
    info!(entity = R::ENTITY, %id, "created");
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(created)))
}

pub async fn update<R: CrudRepository>(
    State(state): State<ServerState>,
    PathId(id): PathId<R::Id>,
    ValidJson(dto): ValidJson<R::Dto>,
) -> Result<Json<R::Dto>, ApiError> {
    if R::dto_id(&dto).is_some_and(|body_id| body_id != id) {
        return Err(ApiError::BadRequest(ID_MISMATCH.into()));
    }
    let txn = state.db.begin().await?;
    if !R::exists(&txn, id.clone()).await? {
        return Err(not_found::<R>());
    }
    let updated = R::update(&txn, id.clone(), dto).await?.ok_or_else(not_found::<R>)?;
    txn.commit().await?;
    info!(entity = R::ENTITY, %id, "updated");
    Ok(Json(updated))
}

pub async fn delete<R: CrudRepository>(State(state): State<ServerState>, PathId(id): PathId<R::Id>) -> Result<Json<Message>, ApiError> {
    let txn = state.db.begin().await?;
    if !R::delete(&txn, id.clone()).await? {
        return Err(not_found::<R>());
    }
    txn.commit().await?;
    info!(entity = R::ENTITY, %id, "deleted");
    Ok(Json(Message::new(format!("{} deleted successfully.", R::ENTITY))))
}
