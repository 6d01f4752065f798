//! TeamTask API
//!
//! Backend for a task-management application's team subsystem:
//! - User registration and JWT login
//! - Team registry with single-owner teams
//! - Membership ledger and owner-gated invitation workflow
//!
//! Storage is pluggable between an in-memory backend and PostgreSQL.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use domain::membership::MembershipRepository;
use domain::team::TeamRepository;
use domain::user::UserRepository;
use domain::DomainError;
use infrastructure::auth::{JwtConfig, JwtService};
use infrastructure::membership::{
    InMemoryMembershipRepository, InvitationWorkflow, MembershipService,
    PostgresMembershipRepository,
};
use infrastructure::storage::{create_pool, run_migrations, PostgresConfig, StorageType};
use infrastructure::team::{InMemoryTeamRepository, PostgresTeamRepository, TeamService};
use infrastructure::user::{
    Argon2Hasher, InMemoryUserRepository, PostgresUserRepository, UserService,
};

/// Build the application state for the configured storage backend
pub async fn create_app_state(config: &AppConfig) -> Result<AppState, DomainError> {
    let storage_type = StorageType::parse(&config.storage.backend).ok_or_else(|| {
        DomainError::validation(format!(
            "Unknown storage backend '{}'",
            config.storage.backend
        ))
    })?;

    let jwt_config = JwtConfig::new(
        config.auth.jwt_secret.clone(),
        config.auth.token_expiration_hours,
    );

    match storage_type {
        StorageType::InMemory => Ok(create_in_memory_state(jwt_config)),
        StorageType::Postgres => {
            let pool = create_pool(
                &PostgresConfig::new(&config.storage.url)
                    .with_max_connections(config.storage.max_connections),
            )
            .await?;

            run_migrations(&pool).await?;

            let users: Arc<dyn UserRepository> = Arc::new(PostgresUserRepository::new(pool.clone()));
            let teams: Arc<dyn TeamRepository> = Arc::new(PostgresTeamRepository::new(pool.clone()));
            let memberships: Arc<dyn MembershipRepository> =
                Arc::new(PostgresMembershipRepository::new(pool));

            Ok(build_state(users, teams, memberships, jwt_config))
        }
    }
}

/// Build application state backed by in-memory repositories
///
/// Used for development and by the router tests.
pub fn create_in_memory_state(jwt_config: JwtConfig) -> AppState {
    let users: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::new());
    let teams: Arc<dyn TeamRepository> = Arc::new(InMemoryTeamRepository::new());
    let memberships: Arc<dyn MembershipRepository> = Arc::new(InMemoryMembershipRepository::new());

    build_state(users, teams, memberships, jwt_config)
}

fn build_state(
    users: Arc<dyn UserRepository>,
    teams: Arc<dyn TeamRepository>,
    memberships: Arc<dyn MembershipRepository>,
    jwt_config: JwtConfig,
) -> AppState {
    let user_service = Arc::new(UserService::new(users.clone(), Arc::new(Argon2Hasher::new())));
    let team_service = Arc::new(TeamService::new(teams.clone(), memberships.clone()));
    let membership_service = Arc::new(MembershipService::new(
        teams.clone(),
        memberships.clone(),
        users,
    ));
    let invitation_workflow = Arc::new(InvitationWorkflow::new(teams, memberships));

    AppState {
        user_service,
        team_service,
        membership_service,
        invitation_workflow,
        jwt_service: Arc::new(JwtService::new(jwt_config)),
    }
}
