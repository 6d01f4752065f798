//! Domain layer - entities, validation and repository traits

pub mod error;
pub mod membership;
pub mod team;
pub mod user;

pub use error::DomainError;
pub use membership::{ContactDetails, Invitation, Membership, MembershipStatus};
pub use team::Team;
pub use user::User;
