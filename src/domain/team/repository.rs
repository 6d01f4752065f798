//! Team repository trait

use async_trait::async_trait;

use crate::domain::user::UserId;
use crate::domain::DomainError;

use super::entity::{Team, TeamId};

/// Repository for team persistence
#[async_trait]
pub trait TeamRepository: Send + Sync + std::fmt::Debug {
    /// Get a team by ID
    async fn get(&self, id: &TeamId) -> Result<Option<Team>, DomainError>;

    /// Create a new team
    async fn create(&self, team: Team) -> Result<Team, DomainError>;

    /// Delete a team by ID, returns true if deleted
    async fn delete(&self, id: &TeamId) -> Result<bool, DomainError>;

    /// List teams owned by a user, ordered by creation time ascending
    async fn list_by_owner(&self, owner_id: &UserId) -> Result<Vec<Team>, DomainError>;

    /// Count all teams
    async fn count(&self) -> Result<usize, DomainError>;
}
