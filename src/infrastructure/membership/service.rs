//! Membership service - the member roster view

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::membership::{Membership, MembershipId, MembershipRepository, MembershipStatus};
use crate::domain::team::{TeamId, TeamRepository};
use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;

/// A member as presented on the team roster
///
/// Accepted members are rendered from their linked user record; pending
/// members fall back to the contact snapshot captured at invite time.
#[derive(Debug, Clone, Serialize)]
pub struct MemberView {
    pub membership_id: MembershipId,
    pub status: MembershipStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    pub invited_by: UserId,
    pub invited_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted_at: Option<DateTime<Utc>>,
}

impl MemberView {
    fn from_snapshot(membership: &Membership) -> Self {
        let contact = membership.contact();

        Self {
            membership_id: membership.id().clone(),
            status: membership.status(),
            user_id: membership.user_id().cloned(),
            name: contact.name.clone(),
            email: contact.email.clone(),
            nickname: contact.nickname.clone(),
            phone_number: contact.phone_number.clone(),
            country_code: contact.country_code.clone(),
            invited_by: membership.invited_by().clone(),
            invited_at: membership.created_at(),
            accepted_at: membership.accepted_at(),
        }
    }

    fn from_user(membership: &Membership, user: &User) -> Self {
        Self {
            membership_id: membership.id().clone(),
            status: membership.status(),
            user_id: Some(user.id().clone()),
            name: user.name().map(str::to_string),
            email: user.email().to_string(),
            nickname: user.nickname().map(str::to_string),
            phone_number: user.phone_number().map(str::to_string),
            country_code: user.country_code().map(str::to_string),
            invited_by: membership.invited_by().clone(),
            invited_at: membership.created_at(),
            accepted_at: membership.accepted_at(),
        }
    }
}

/// Membership service
#[derive(Debug)]
pub struct MembershipService {
    teams: Arc<dyn TeamRepository>,
    memberships: Arc<dyn MembershipRepository>,
    users: Arc<dyn UserRepository>,
}

impl MembershipService {
    /// Create a new membership service
    pub fn new(
        teams: Arc<dyn TeamRepository>,
        memberships: Arc<dyn MembershipRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            teams,
            memberships,
            users,
        }
    }

    /// List the member roster of a team
    ///
    /// Visible to the owner and to accepted members; anyone else gets
    /// Forbidden. A missing team is NotFound regardless of the actor.
    pub async fn list_members(
        &self,
        team_id: &TeamId,
        actor: &UserId,
    ) -> Result<Vec<MemberView>, DomainError> {
        let team = self
            .teams
            .get(team_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Team '{}' not found", team_id)))?;

        let memberships = self.memberships.list_by_team(team_id).await?;

        if !team.is_owned_by(actor)
            && !memberships.iter().any(|m| m.is_accepted_by(actor))
        {
            return Err(DomainError::forbidden(
                "Only the team owner and accepted members can view the roster",
            ));
        }

        let mut roster = Vec::with_capacity(memberships.len());

        for membership in &memberships {
            let view = match membership.user_id() {
                // A linked user may have been deleted since acceptance; the
                // snapshot still renders the row
                Some(user_id) => match self.users.get(user_id).await? {
                    Some(user) => MemberView::from_user(membership, &user),
                    None => MemberView::from_snapshot(membership),
                },
                None => MemberView::from_snapshot(membership),
            };

            roster.push(view);
        }

        Ok(roster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::membership::{ContactDetails, Invitation, InvitationId};
    use crate::domain::team::Team;
    use crate::infrastructure::membership::InMemoryMembershipRepository;
    use crate::infrastructure::team::InMemoryTeamRepository;
    use crate::infrastructure::user::InMemoryUserRepository;

    struct Fixture {
        teams: Arc<InMemoryTeamRepository>,
        memberships: Arc<InMemoryMembershipRepository>,
        users: Arc<InMemoryUserRepository>,
        service: MembershipService,
    }

    fn fixture() -> Fixture {
        let teams = Arc::new(InMemoryTeamRepository::new());
        let memberships = Arc::new(InMemoryMembershipRepository::new());
        let users = Arc::new(InMemoryUserRepository::new());
        let service = MembershipService::new(teams.clone(), memberships.clone(), users.clone());

        Fixture {
            teams,
            memberships,
            users,
            service,
        }
    }

    async fn seed_team(fx: &Fixture, owner: &UserId) -> Team {
        let team = Team::new(TeamId::generate(), "Alpha", owner.clone()).unwrap();
        fx.teams.create(team.clone()).await.unwrap();
        team
    }

    async fn seed_invite(fx: &Fixture, team: &Team, email: &str) -> Membership {
        let membership = Membership::new_pending(
            MembershipId::generate(),
            team.id().clone(),
            ContactDetails::new(email).with_name("Snapshot Name"),
            team.owner_id().clone(),
        );
        let invitation = Invitation::new(
            InvitationId::generate(),
            team.id().clone(),
            membership.id().clone(),
            membership.contact().clone(),
            team.owner_id().clone(),
        );
        fx.memberships
            .create_invite(membership.clone(), invitation)
            .await
            .unwrap();
        membership
    }

    #[tokio::test]
    async fn test_owner_sees_roster() {
        let fx = fixture();
        let owner = UserId::generate();
        let team = seed_team(&fx, &owner).await;

        seed_invite(&fx, &team, "bob@x.com").await;

        let roster = fx.service.list_members(team.id(), &owner).await.unwrap();

        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].email, "bob@x.com");
        assert_eq!(roster[0].status, MembershipStatus::Pending);
        assert_eq!(roster[0].name.as_deref(), Some("Snapshot Name"));
    }

    #[tokio::test]
    async fn test_stranger_is_forbidden() {
        let fx = fixture();
        let owner = UserId::generate();
        let team = seed_team(&fx, &owner).await;

        let result = fx
            .service
            .list_members(team.id(), &UserId::generate())
            .await;

        assert!(matches!(result, Err(DomainError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_pending_invitee_is_forbidden() {
        let fx = fixture();
        let owner = UserId::generate();
        let team = seed_team(&fx, &owner).await;

        seed_invite(&fx, &team, "bob@x.com").await;

        // An invitee who has not accepted has no roster access yet
        let result = fx
            .service
            .list_members(team.id(), &UserId::generate())
            .await;

        assert!(matches!(result, Err(DomainError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_accepted_member_sees_roster() {
        let fx = fixture();
        let owner = UserId::generate();
        let member = UserId::generate();
        let team = seed_team(&fx, &owner).await;

        let mut membership = seed_invite(&fx, &team, "bob@x.com").await;
        membership.accept(member.clone()).unwrap();
        fx.memberships.update_membership(&membership).await.unwrap();

        let roster = fx.service.list_members(team.id(), &member).await.unwrap();
        assert_eq!(roster.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_team() {
        let fx = fixture();

        let result = fx
            .service
            .list_members(&TeamId::generate(), &UserId::generate())
            .await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_accepted_member_rendered_from_user_record() {
        let fx = fixture();
        let owner = UserId::generate();
        let team = seed_team(&fx, &owner).await;

        let user = User::new(UserId::generate(), "bob@x.com", "hash").with_name("Real Name");
        fx.users.create(user.clone()).await.unwrap();

        let mut membership = seed_invite(&fx, &team, "bob@x.com").await;
        membership.accept(user.id().clone()).unwrap();
        fx.memberships.update_membership(&membership).await.unwrap();

        let roster = fx.service.list_members(team.id(), &owner).await.unwrap();

        assert_eq!(roster[0].name.as_deref(), Some("Real Name"));
        assert_eq!(roster[0].user_id.as_ref(), Some(user.id()));
        assert!(roster[0].accepted_at.is_some());
    }

    #[tokio::test]
    async fn test_dangling_user_falls_back_to_snapshot() {
        let fx = fixture();
        let owner = UserId::generate();
        let team = seed_team(&fx, &owner).await;

        // Accepted by a user that no longer exists in the user store
        let mut membership = seed_invite(&fx, &team, "bob@x.com").await;
        membership.accept(UserId::generate()).unwrap();
        fx.memberships.update_membership(&membership).await.unwrap();

        let roster = fx.service.list_members(team.id(), &owner).await.unwrap();

        assert_eq!(roster[0].name.as_deref(), Some("Snapshot Name"));
        assert_eq!(roster[0].email, "bob@x.com");
    }
}
