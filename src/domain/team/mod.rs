//! Team domain - the team registry

mod entity;
mod repository;
mod validation;

pub use entity::{Team, TeamId};
pub use repository::TeamRepository;
pub use validation::{validate_team_description, validate_team_name, TeamValidationError};
