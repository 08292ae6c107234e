//! Service layer providing business-oriented operations on top of models.
//! - Separates business logic from data access.
//! - Reuses validation and entity definitions in `models` crate.
//! - Every repository call runs on a caller-supplied connection or transaction.

pub mod errors;
pub mod repository;
pub mod reference;
pub mod user;
pub mod auth;
#[cfg(test)]
pub mod test_support;

pub use errors::ServiceError;
pub use repository::CrudRepository;
