//! Invitation entity - the addressable handle a recipient uses to accept

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::team::TeamId;
use crate::domain::user::UserId;

use super::membership::{ContactDetails, MembershipId};

/// Invitation identifier - a UUID string
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvitationId(String);

impl InvitationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for InvitationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Invitation entity
///
/// Immutable once created; maps 1:1 to the pending membership it references.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invitation {
    id: InvitationId,
    team_id: TeamId,
    membership_id: MembershipId,
    contact: ContactDetails,
    invited_by: UserId,
    created_at: DateTime<Utc>,
}

impl Invitation {
    /// Create a new invitation referencing a pending membership
    pub fn new(
        id: InvitationId,
        team_id: TeamId,
        membership_id: MembershipId,
        contact: ContactDetails,
        invited_by: UserId,
    ) -> Self {
        Self {
            id,
            team_id,
            membership_id,
            contact,
            invited_by,
            created_at: Utc::now(),
        }
    }

    /// Restore an entity from persisted fields
    pub fn from_parts(
        id: InvitationId,
        team_id: TeamId,
        membership_id: MembershipId,
        contact: ContactDetails,
        invited_by: UserId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            team_id,
            membership_id,
            contact,
            invited_by,
            created_at,
        }
    }

    pub fn id(&self) -> &InvitationId {
        &self.id
    }

    pub fn team_id(&self) -> &TeamId {
        &self.team_id
    }

    pub fn membership_id(&self) -> &MembershipId {
        &self.membership_id
    }

    pub fn contact(&self) -> &ContactDetails {
        &self.contact
    }

    /// The invited email; acceptance is gated on matching it
    pub fn email(&self) -> &str {
        &self.contact.email
    }

    pub fn invited_by(&self) -> &UserId {
        &self.invited_by
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
