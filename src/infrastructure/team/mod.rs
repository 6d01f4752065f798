//! Team infrastructure - persistence and the team service

mod postgres_repository;
mod repository;
mod service;

pub use postgres_repository::PostgresTeamRepository;
pub use repository::InMemoryTeamRepository;
pub use service::{CreateTeamRequest, TeamService};
