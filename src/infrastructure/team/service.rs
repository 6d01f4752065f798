//! Team service - creation, lookup, listings and deletion

use std::sync::Arc;

use tracing::info;

use crate::domain::membership::{MembershipRepository, MembershipStatus};
use crate::domain::team::{validate_team_description, Team, TeamId, TeamRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Request for creating a team
#[derive(Debug, Clone)]
pub struct CreateTeamRequest {
    pub name: String,
    pub description: Option<String>,
}

/// Team service
///
/// Holds the membership repository alongside the team repository so that
/// deleting a team can cascade over its membership ledger.
#[derive(Debug)]
pub struct TeamService {
    teams: Arc<dyn TeamRepository>,
    memberships: Arc<dyn MembershipRepository>,
}

impl TeamService {
    /// Create a new team service
    pub fn new(teams: Arc<dyn TeamRepository>, memberships: Arc<dyn MembershipRepository>) -> Self {
        Self { teams, memberships }
    }

    /// Create a team owned by the given user
    pub async fn create(
        &self,
        owner_id: UserId,
        request: CreateTeamRequest,
    ) -> Result<Team, DomainError> {
        if let Some(description) = &request.description {
            validate_team_description(description)
                .map_err(|e| DomainError::validation(e.to_string()))?;
        }

        let mut team = Team::new(TeamId::generate(), request.name, owner_id)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        if let Some(description) = request.description {
            team = team.with_description(description);
        }

        let team = self.teams.create(team).await?;

        info!(team_id = %team.id(), owner_id = %team.owner_id(), "Created team");

        Ok(team)
    }

    /// Get a team by ID
    pub async fn get(&self, id: &TeamId) -> Result<Team, DomainError> {
        self.teams
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Team '{}' not found", id)))
    }

    /// Get a team on behalf of an actor
    ///
    /// The owner and accepted members may view a team; anyone else gets
    /// Forbidden.
    pub async fn get_for_actor(&self, id: &TeamId, actor: &UserId) -> Result<Team, DomainError> {
        let team = self.get(id).await?;

        if team.is_owned_by(actor) {
            return Ok(team);
        }

        let accepted = self
            .memberships
            .list_by_user(actor, Some(MembershipStatus::Accepted))
            .await?;

        if accepted.iter().any(|m| m.team_id() == id) {
            Ok(team)
        } else {
            Err(DomainError::forbidden(
                "Only the team owner and accepted members can view this team",
            ))
        }
    }

    /// List teams owned by a user
    pub async fn list_owned(&self, owner_id: &UserId) -> Result<Vec<Team>, DomainError> {
        self.teams.list_by_owner(owner_id).await
    }

    /// List teams the user belongs to through an accepted membership
    ///
    /// Teams the user owns are excluded even if a membership record exists,
    /// ownership and membership are reported through separate listings.
    pub async fn list_member_of(&self, user_id: &UserId) -> Result<Vec<Team>, DomainError> {
        let memberships = self
            .memberships
            .list_by_user(user_id, Some(MembershipStatus::Accepted))
            .await?;

        let mut teams = Vec::with_capacity(memberships.len());

        for membership in memberships {
            // The team may have been deleted between listing and resolution
            if let Some(team) = self.teams.get(membership.team_id()).await? {
                if !team.is_owned_by(user_id) {
                    teams.push(team);
                }
            }
        }

        teams.sort_by_key(|t| t.created_at());

        Ok(teams)
    }

    /// Delete a team and cascade over its memberships and invitations
    ///
    /// Only the owner may delete; anyone else gets Forbidden without
    /// learning anything beyond the team's existence.
    pub async fn delete(&self, id: &TeamId, actor: &UserId) -> Result<(), DomainError> {
        let team = self.get(id).await?;

        if !team.is_owned_by(actor) {
            return Err(DomainError::forbidden(
                "Only the team owner can delete the team",
            ));
        }

        let removed = self.memberships.delete_by_team(id).await?;
        self.teams.delete(id).await?;

        info!(team_id = %id, memberships_removed = removed, "Deleted team");

        Ok(())
    }

    /// Count all teams
    pub async fn count(&self) -> Result<usize, DomainError> {
        self.teams.count().await
    }
}
