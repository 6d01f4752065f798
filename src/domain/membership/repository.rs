//! Membership and invitation repository trait
//!
//! Memberships and invitations are created together (one invitation per
//! pending membership) and cascade-deleted together with their team, so a
//! single repository owns both records. `create_invite` is the race guard
//! for the one-membership-per-(team, email) invariant: implementations must
//! perform the uniqueness check and both inserts atomically.

use async_trait::async_trait;

use crate::domain::team::TeamId;
use crate::domain::user::UserId;
use crate::domain::DomainError;

use super::invitation::{Invitation, InvitationId};
use super::membership::{Membership, MembershipId, MembershipStatus};

/// Repository for membership and invitation persistence
#[async_trait]
pub trait MembershipRepository: Send + Sync + std::fmt::Debug {
    /// Atomically create a pending membership and its invitation
    ///
    /// Fails with Conflict if a membership already exists for the
    /// membership's email on its team, in any status.
    async fn create_invite(
        &self,
        membership: Membership,
        invitation: Invitation,
    ) -> Result<Invitation, DomainError>;

    /// Get a membership by ID
    async fn get_membership(&self, id: &MembershipId) -> Result<Option<Membership>, DomainError>;

    /// Get an invitation by ID, scoped to a team
    async fn get_invitation_in_team(
        &self,
        team_id: &TeamId,
        id: &InvitationId,
    ) -> Result<Option<Invitation>, DomainError>;

    /// List all memberships for a team, ordered by creation time ascending
    async fn list_by_team(&self, team_id: &TeamId) -> Result<Vec<Membership>, DomainError>;

    /// List memberships linked to a user, optionally filtered by status
    async fn list_by_user(
        &self,
        user_id: &UserId,
        status: Option<MembershipStatus>,
    ) -> Result<Vec<Membership>, DomainError>;

    /// Find the membership for an email on a team
    async fn find_by_team_and_email(
        &self,
        team_id: &TeamId,
        email: &str,
    ) -> Result<Option<Membership>, DomainError>;

    /// Persist a membership state transition
    async fn update_membership(&self, membership: &Membership) -> Result<Membership, DomainError>;

    /// Delete all memberships and invitations for a team, returns the number
    /// of memberships removed
    async fn delete_by_team(&self, team_id: &TeamId) -> Result<usize, DomainError>;
}
