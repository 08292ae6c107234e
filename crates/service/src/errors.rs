use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn stale(entity: &str) -> Self {
        Self::Conflict(format!("{} was modified by another request; reload and retry.", entity))
    }
}

impl From<DbErr> for ServiceError {
    fn from(e: DbErr) -> Self {
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => ServiceError::Conflict(detail),
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => ServiceError::Validation(detail),
            _ => ServiceError::Db(e.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(e: validator::ValidationErrors) -> Self { ServiceError::Validation(e.to_string()) }
}
