//! In-memory membership and invitation repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::membership::{
    Invitation, InvitationId, Membership, MembershipId, MembershipRepository, MembershipStatus,
};
use crate::domain::team::TeamId;
use crate::domain::user::UserId;
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct Store {
    memberships: HashMap<String, Membership>,
    invitations: HashMap<String, Invitation>,
    /// Index for (team ID, email) -> membership ID lookup
    team_email_index: HashMap<(String, String), String>,
}

/// In-memory implementation of MembershipRepository
///
/// A single lock guards memberships, invitations and the uniqueness index
/// so that `create_invite` checks and inserts in one critical section.
#[derive(Debug)]
pub struct InMemoryMembershipRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryMembershipRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(Store::default())),
        }
    }
}

impl Default for InMemoryMembershipRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MembershipRepository for InMemoryMembershipRepository {
    async fn create_invite(
        &self,
        membership: Membership,
        invitation: Invitation,
    ) -> Result<Invitation, DomainError> {
        let mut store = self.store.write().await;

        let key = (
            membership.team_id().as_str().to_string(),
            membership.email().to_string(),
        );

        if store.team_email_index.contains_key(&key) {
            return Err(DomainError::conflict(format!(
                "A membership for '{}' already exists on this team",
                membership.email()
            )));
        }

        let membership_id = membership.id().as_str().to_string();
        let invitation_id = invitation.id().as_str().to_string();

        store.team_email_index.insert(key, membership_id.clone());
        store.memberships.insert(membership_id, membership);
        store.invitations.insert(invitation_id, invitation.clone());

        Ok(invitation)
    }

    async fn get_membership(&self, id: &MembershipId) -> Result<Option<Membership>, DomainError> {
        let store = self.store.read().await;
        Ok(store.memberships.get(id.as_str()).cloned())
    }

    async fn get_invitation_in_team(
        &self,
        team_id: &TeamId,
        id: &InvitationId,
    ) -> Result<Option<Invitation>, DomainError> {
        let store = self.store.read().await;

        Ok(store
            .invitations
            .get(id.as_str())
            .filter(|i| i.team_id() == team_id)
            .cloned())
    }

    async fn list_by_team(&self, team_id: &TeamId) -> Result<Vec<Membership>, DomainError> {
        let store = self.store.read().await;

        let mut members: Vec<Membership> = store
            .memberships
            .values()
            .filter(|m| m.team_id() == team_id)
            .cloned()
            .collect();

        members.sort_by_key(|m| m.created_at());

        Ok(members)
    }

    async fn list_by_user(
        &self,
        user_id: &UserId,
        status: Option<MembershipStatus>,
    ) -> Result<Vec<Membership>, DomainError> {
        let store = self.store.read().await;

        let mut members: Vec<Membership> = store
            .memberships
            .values()
            .filter(|m| m.user_id() == Some(user_id))
            .filter(|m| status.is_none_or(|s| m.status() == s))
            .cloned()
            .collect();

        members.sort_by_key(|m| m.created_at());

        Ok(members)
    }

    async fn find_by_team_and_email(
        &self,
        team_id: &TeamId,
        email: &str,
    ) -> Result<Option<Membership>, DomainError> {
        let store = self.store.read().await;

        let key = (team_id.as_str().to_string(), email.to_string());

        Ok(store
            .team_email_index
            .get(&key)
            .and_then(|id| store.memberships.get(id))
            .cloned())
    }

    async fn update_membership(&self, membership: &Membership) -> Result<Membership, DomainError> {
        let mut store = self.store.write().await;

        let id = membership.id().as_str().to_string();

        if !store.memberships.contains_key(&id) {
            return Err(DomainError::not_found(format!(
                "Membership '{}' not found",
                id
            )));
        }

        store.memberships.insert(id, membership.clone());

        Ok(membership.clone())
    }

    async fn delete_by_team(&self, team_id: &TeamId) -> Result<usize, DomainError> {
        let mut store = self.store.write().await;

        let before = store.memberships.len();

        store.memberships.retain(|_, m| m.team_id() != team_id);
        store.invitations.retain(|_, i| i.team_id() != team_id);
        store
            .team_email_index
            .retain(|(team, _), _| team != team_id.as_str());

        Ok(before - store.memberships.len())
    }
}
