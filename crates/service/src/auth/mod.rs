//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Registration, login with lockout, and JWT issuance live here, independent
//! of the HTTP framework.

pub mod domain;
pub mod errors;
pub mod password;
pub mod repository;
pub mod service;
pub mod repo;
pub mod token;

pub use service::AuthService;
pub use token::{Claims, TokenIssuer};
