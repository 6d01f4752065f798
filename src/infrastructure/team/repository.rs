//! In-memory team repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::team::{Team, TeamId, TeamRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// In-memory implementation of TeamRepository
#[derive(Debug)]
pub struct InMemoryTeamRepository {
    teams: Arc<RwLock<HashMap<String, Team>>>,
}

impl InMemoryTeamRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self {
            teams: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryTeamRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TeamRepository for InMemoryTeamRepository {
    async fn get(&self, id: &TeamId) -> Result<Option<Team>, DomainError> {
        let teams = self.teams.read().await;
        Ok(teams.get(id.as_str()).cloned())
    }

    async fn create(&self, team: Team) -> Result<Team, DomainError> {
        let mut teams = self.teams.write().await;

        let id = team.id().as_str().to_string();

        if teams.contains_key(&id) {
            return Err(DomainError::conflict(format!(
                "Team with ID '{}' already exists",
                id
            )));
        }

        teams.insert(id, team.clone());

        Ok(team)
    }

    async fn delete(&self, id: &TeamId) -> Result<bool, DomainError> {
        let mut teams = self.teams.write().await;
        Ok(teams.remove(id.as_str()).is_some())
    }

    async fn list_by_owner(&self, owner_id: &UserId) -> Result<Vec<Team>, DomainError> {
        let teams = self.teams.read().await;

        let mut owned: Vec<Team> = teams
            .values()
            .filter(|t| t.is_owned_by(owner_id))
            .cloned()
            .collect();

        owned.sort_by_key(|t| t.created_at());

        Ok(owned)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let teams = self.teams.read().await;
        Ok(teams.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_team(name: &str, owner: &UserId) -> Team {
        Team::new(TeamId::generate(), name, owner.clone()).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = InMemoryTeamRepository::new();
        let owner = UserId::generate();
        let team = create_team("Alpha", &owner);

        repo.create(team.clone()).await.unwrap();

        let retrieved = repo.get(team.id()).await.unwrap();
        assert!(retrieved.is_some());
        assert_eq!(retrieved.unwrap().name(), "Alpha");
    }

    #[tokio::test]
    async fn test_get_nonexistent() {
        let repo = InMemoryTeamRepository::new();

        let retrieved = repo.get(&TeamId::generate()).await.unwrap();
        assert!(retrieved.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_id() {
        let repo = InMemoryTeamRepository::new();
        let owner = UserId::generate();
        let team = create_team("Alpha", &owner);

        repo.create(team.clone()).await.unwrap();

        let result = repo.create(team).await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = InMemoryTeamRepository::new();
        let owner = UserId::generate();
        let team = create_team("Alpha", &owner);

        repo.create(team.clone()).await.unwrap();

        assert!(repo.delete(team.id()).await.unwrap());
        assert!(!repo.delete(team.id()).await.unwrap());

        let retrieved = repo.get(team.id()).await.unwrap();
        assert!(retrieved.is_none());
    }

    #[tokio::test]
    async fn test_list_by_owner() {
        let repo = InMemoryTeamRepository::new();
        let alice = UserId::generate();
        let bob = UserId::generate();

        repo.create(create_team("Alpha", &alice)).await.unwrap();
        repo.create(create_team("Beta", &alice)).await.unwrap();
        repo.create(create_team("Gamma", &bob)).await.unwrap();

        let alice_teams = repo.list_by_owner(&alice).await.unwrap();
        assert_eq!(alice_teams.len(), 2);

        let bob_teams = repo.list_by_owner(&bob).await.unwrap();
        assert_eq!(bob_teams.len(), 1);
        assert_eq!(bob_teams[0].name(), "Gamma");
    }

    #[tokio::test]
    async fn test_list_by_owner_ordering() {
        let repo = InMemoryTeamRepository::new();
        let owner = UserId::generate();

        for name in ["First", "Second", "Third"] {
            repo.create(create_team(name, &owner)).await.unwrap();
        }

        let teams = repo.list_by_owner(&owner).await.unwrap();
        let names: Vec<&str> = teams.iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
    }

    #[tokio::test]
    async fn test_count() {
        let repo = InMemoryTeamRepository::new();
        let owner = UserId::generate();

        assert_eq!(repo.count().await.unwrap(), 0);

        repo.create(create_team("Alpha", &owner)).await.unwrap();
        repo.create(create_team("Beta", &owner)).await.unwrap();

        assert_eq!(repo.count().await.unwrap(), 2);
    }
}
