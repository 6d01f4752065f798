//! Invitation workflow - issuing and accepting invitations

use std::sync::Arc;

use tracing::info;

use crate::domain::membership::{
    ContactDetails, Invitation, InvitationId, Membership, MembershipId, MembershipRepository,
};
use crate::domain::team::{TeamId, TeamRepository};
use crate::domain::user::{validate_email, User, UserId};
use crate::domain::DomainError;

/// Request for inviting a contact to a team
#[derive(Debug, Clone)]
pub struct InviteRequest {
    pub email: String,
    pub name: Option<String>,
    pub nickname: Option<String>,
    pub phone_number: Option<String>,
    pub country_code: Option<String>,
}

/// Invitation workflow
///
/// Issues invitations on behalf of team owners and processes acceptances.
/// Uniqueness of (team, email) is enforced by the repository, not here, so
/// two racing invites cannot both succeed.
#[derive(Debug)]
pub struct InvitationWorkflow {
    teams: Arc<dyn TeamRepository>,
    memberships: Arc<dyn MembershipRepository>,
}

impl InvitationWorkflow {
    /// Create a new invitation workflow
    pub fn new(teams: Arc<dyn TeamRepository>, memberships: Arc<dyn MembershipRepository>) -> Self {
        Self { teams, memberships }
    }

    /// Invite a contact to a team
    ///
    /// Only the team owner may invite. The contact's email is normalized
    /// before the uniqueness check, so case variants of one address cannot
    /// yield two memberships.
    pub async fn invite(
        &self,
        team_id: &TeamId,
        actor: &UserId,
        request: InviteRequest,
    ) -> Result<Invitation, DomainError> {
        let team = self
            .teams
            .get(team_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Team '{}' not found", team_id)))?;

        if !team.is_owned_by(actor) {
            return Err(DomainError::forbidden(
                "Only the team owner can invite members",
            ));
        }

        validate_email(&request.email).map_err(|e| DomainError::validation(e.to_string()))?;

        let mut contact = ContactDetails::new(&request.email);
        contact.name = request.name;
        contact.nickname = request.nickname;

        if let (Some(phone), Some(country)) = (request.phone_number, request.country_code) {
            contact = contact.with_phone(phone, country);
        }

        let membership = Membership::new_pending(
            MembershipId::generate(),
            team_id.clone(),
            contact.clone(),
            actor.clone(),
        );

        let invitation = Invitation::new(
            InvitationId::generate(),
            team_id.clone(),
            membership.id().clone(),
            contact,
            actor.clone(),
        );

        let invitation = self.memberships.create_invite(membership, invitation).await?;

        info!(
            team_id = %team_id,
            invitation_id = %invitation.id(),
            "Issued invitation"
        );

        Ok(invitation)
    }

    /// Accept an invitation on behalf of the authenticated user
    ///
    /// The acting user's email must match the invited address. Accepting a
    /// membership that is already accepted is a Conflict, whoever asks.
    pub async fn accept(
        &self,
        team_id: &TeamId,
        invitation_id: &InvitationId,
        actor: &User,
    ) -> Result<Membership, DomainError> {
        self.teams
            .get(team_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Team '{}' not found", team_id)))?;

        let invitation = self
            .memberships
            .get_invitation_in_team(team_id, invitation_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(format!("Invitation '{}' not found", invitation_id))
            })?;

        let mut membership = self
            .memberships
            .get_membership(invitation.membership_id())
            .await?
            .ok_or_else(|| {
                DomainError::internal(format!(
                    "Invitation '{}' references a missing membership",
                    invitation_id
                ))
            })?;

        if membership.is_accepted() {
            return Err(DomainError::conflict(format!(
                "Invitation '{}' has already been accepted",
                invitation_id
            )));
        }

        if actor.email() != invitation.email() {
            return Err(DomainError::forbidden(
                "This invitation was issued to a different email address",
            ));
        }

        membership.accept(actor.id().clone())?;

        let membership = self.memberships.update_membership(&membership).await?;

        info!(
            team_id = %team_id,
            membership_id = %membership.id(),
            user_id = %actor.id(),
            "Accepted invitation"
        );

        Ok(membership)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::membership::MembershipStatus;
    use crate::domain::team::Team;
    use crate::infrastructure::membership::InMemoryMembershipRepository;
    use crate::infrastructure::team::InMemoryTeamRepository;

    struct Fixture {
        teams: Arc<InMemoryTeamRepository>,
        workflow: InvitationWorkflow,
    }

    fn fixture() -> Fixture {
        let teams = Arc::new(InMemoryTeamRepository::new());
        let memberships = Arc::new(InMemoryMembershipRepository::new());
        let workflow = InvitationWorkflow::new(teams.clone(), memberships);

        Fixture { teams, workflow }
    }

    async fn seed_team(fx: &Fixture, owner: &UserId) -> Team {
        let team = Team::new(TeamId::generate(), "Alpha", owner.clone()).unwrap();
        fx.teams.create(team.clone()).await.unwrap();
        team
    }

    fn invite_request(email: &str) -> InviteRequest {
        InviteRequest {
            email: email.to_string(),
            name: None,
            nickname: None,
            phone_number: None,
            country_code: None,
        }
    }

    fn invitee(email: &str) -> User {
        User::new(UserId::generate(), email, "hash")
    }

    #[tokio::test]
    async fn test_invite() {
        let fx = fixture();
        let owner = UserId::generate();
        let team = seed_team(&fx, &owner).await;

        let invitation = fx
            .workflow
            .invite(team.id(), &owner, invite_request("bob@x.com"))
            .await
            .unwrap();

        assert_eq!(invitation.team_id(), team.id());
        assert_eq!(invitation.email(), "bob@x.com");
    }

    #[tokio::test]
    async fn test_invite_missing_team() {
        let fx = fixture();

        let result = fx
            .workflow
            .invite(
                &TeamId::generate(),
                &UserId::generate(),
                invite_request("bob@x.com"),
            )
            .await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_invite_by_non_owner() {
        let fx = fixture();
        let owner = UserId::generate();
        let team = seed_team(&fx, &owner).await;

        let result = fx
            .workflow
            .invite(team.id(), &UserId::generate(), invite_request("bob@x.com"))
            .await;

        assert!(matches!(result, Err(DomainError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_invite_by_accepted_member() {
        let fx = fixture();
        let owner = UserId::generate();
        let team = seed_team(&fx, &owner).await;
        let member = invitee("bob@x.com");

        let invitation = fx
            .workflow
            .invite(team.id(), &owner, invite_request("bob@x.com"))
            .await
            .unwrap();

        fx.workflow
            .accept(team.id(), invitation.id(), &member)
            .await
            .unwrap();

        // Membership does not grant invite rights
        let result = fx
            .workflow
            .invite(team.id(), member.id(), invite_request("carol@x.com"))
            .await;

        assert!(matches!(result, Err(DomainError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_invite_invalid_email() {
        let fx = fixture();
        let owner = UserId::generate();
        let team = seed_team(&fx, &owner).await;

        let result = fx
            .workflow
            .invite(team.id(), &owner, invite_request("not-an-email"))
            .await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_invite_duplicate_email() {
        let fx = fixture();
        let owner = UserId::generate();
        let team = seed_team(&fx, &owner).await;

        fx.workflow
            .invite(team.id(), &owner, invite_request("bob@x.com"))
            .await
            .unwrap();

        // Case variant of the same address still collides
        let result = fx
            .workflow
            .invite(team.id(), &owner, invite_request("Bob@X.com"))
            .await;

        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_concurrent_invites_single_winner() {
        let teams = Arc::new(InMemoryTeamRepository::new());
        let memberships = Arc::new(InMemoryMembershipRepository::new());
        let workflow = Arc::new(InvitationWorkflow::new(teams.clone(), memberships.clone()));

        let owner = UserId::generate();
        let team = Team::new(TeamId::generate(), "Alpha", owner.clone()).unwrap();
        teams.create(team.clone()).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..32 {
            let workflow = workflow.clone();
            let team_id = team.id().clone();
            let owner = owner.clone();

            handles.push(tokio::spawn(async move {
                workflow
                    .invite(&team_id, &owner, invite_request("bob@x.com"))
                    .await
            }));
        }

        let mut accepted = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => accepted += 1,
                Err(DomainError::Conflict { .. }) => conflicts += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(accepted, 1);
        assert_eq!(conflicts, 31);

        let members = memberships.list_by_team(team.id()).await.unwrap();
        assert_eq!(members.len(), 1);
    }

    #[tokio::test]
    async fn test_accept() {
        let fx = fixture();
        let owner = UserId::generate();
        let team = seed_team(&fx, &owner).await;
        let user = invitee("bob@x.com");

        let invitation = fx
            .workflow
            .invite(team.id(), &owner, invite_request("bob@x.com"))
            .await
            .unwrap();

        let membership = fx
            .workflow
            .accept(team.id(), invitation.id(), &user)
            .await
            .unwrap();

        assert_eq!(membership.status(), MembershipStatus::Accepted);
        assert_eq!(membership.user_id(), Some(user.id()));
        assert!(membership.accepted_at().is_some());
    }

    #[tokio::test]
    async fn test_accept_missing_invitation() {
        let fx = fixture();
        let owner = UserId::generate();
        let team = seed_team(&fx, &owner).await;

        let result = fx
            .workflow
            .accept(team.id(), &InvitationId::generate(), &invitee("bob@x.com"))
            .await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_accept_wrong_team() {
        let fx = fixture();
        let owner = UserId::generate();
        let team_a = seed_team(&fx, &owner).await;
        let team_b = seed_team(&fx, &owner).await;

        let invitation = fx
            .workflow
            .invite(team_a.id(), &owner, invite_request("bob@x.com"))
            .await
            .unwrap();

        let result = fx
            .workflow
            .accept(team_b.id(), invitation.id(), &invitee("bob@x.com"))
            .await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_accept_email_mismatch() {
        let fx = fixture();
        let owner = UserId::generate();
        let team = seed_team(&fx, &owner).await;

        let invitation = fx
            .workflow
            .invite(team.id(), &owner, invite_request("bob@x.com"))
            .await
            .unwrap();

        let result = fx
            .workflow
            .accept(team.id(), invitation.id(), &invitee("mallory@x.com"))
            .await;

        assert!(matches!(result, Err(DomainError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_accept_twice() {
        let fx = fixture();
        let owner = UserId::generate();
        let team = seed_team(&fx, &owner).await;
        let user = invitee("bob@x.com");

        let invitation = fx
            .workflow
            .invite(team.id(), &owner, invite_request("bob@x.com"))
            .await
            .unwrap();

        fx.workflow
            .accept(team.id(), invitation.id(), &user)
            .await
            .unwrap();

        // Even the same user cannot accept again
        let result = fx.workflow.accept(team.id(), invitation.id(), &user).await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_conflict_checked_before_email() {
        let fx = fixture();
        let owner = UserId::generate();
        let team = seed_team(&fx, &owner).await;

        let invitation = fx
            .workflow
            .invite(team.id(), &owner, invite_request("bob@x.com"))
            .await
            .unwrap();

        fx.workflow
            .accept(team.id(), invitation.id(), &invitee("bob@x.com"))
            .await
            .unwrap();

        // An accepted invitation reports Conflict even to the wrong user
        let result = fx
            .workflow
            .accept(team.id(), invitation.id(), &invitee("mallory@x.com"))
            .await;

        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }
}
