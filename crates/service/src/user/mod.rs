//! User administration: account CRUD plus role membership management.

mod dto;
mod repository;

pub use dto::{RoleDto, RoleNames, UserDto};
pub use repository::UserRepository;
