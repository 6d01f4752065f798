//! User domain - the identity collaborator

mod entity;
mod repository;
mod validation;

pub use entity::{User, UserId};
pub use repository::UserRepository;
pub use validation::{normalize_email, validate_email, validate_password, UserValidationError};
