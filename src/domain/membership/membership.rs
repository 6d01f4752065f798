//! Membership entity - links a team to a pending invitee or an accepted user

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::team::TeamId;
use crate::domain::user::{normalize_email, UserId};
use crate::domain::DomainError;

/// Membership identifier - a UUID string
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MembershipId(String);

impl MembershipId {
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

impl std::fmt::Display for MembershipId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Contact details snapshot captured at invite time
///
/// The email is the identity key for a pending membership; the remaining
/// fields are display data until a real user record is linked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
}

impl ContactDetails {
    /// Create contact details keyed by email
    pub fn new(email: impl AsRef<str>) -> Self {
        Self {
            name: None,
            email: normalize_email(email.as_ref()),
            phone_number: None,
            country_code: None,
            nickname: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_phone(
        mut self,
        phone_number: impl Into<String>,
        country_code: impl Into<String>,
    ) -> Self {
        self.phone_number = Some(phone_number.into());
        self.country_code = Some(country_code.into());
        self
    }

    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }
}

/// Status of a membership
///
/// The only transition is pending -> accepted; a membership never reverts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MembershipStatus {
    #[default]
    Pending,
    Accepted,
}

impl MembershipStatus {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

impl std::fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Accepted => write!(f, "accepted"),
        }
    }
}

/// Membership entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Membership {
    id: MembershipId,
    team_id: TeamId,
    status: MembershipStatus,
    /// Linked user, set at acceptance time
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<UserId>,
    contact: ContactDetails,
    invited_by: UserId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    accepted_at: Option<DateTime<Utc>>,
}

impl Membership {
    /// Create a pending membership for an invited contact
    pub fn new_pending(
        id: MembershipId,
        team_id: TeamId,
        contact: ContactDetails,
        invited_by: UserId,
    ) -> Self {
        let now = Utc::now();

        Self {
            id,
            team_id,
            status: MembershipStatus::Pending,
            user_id: None,
            contact,
            invited_by,
            created_at: now,
            updated_at: now,
            accepted_at: None,
        }
    }

    /// Restore an entity from persisted fields
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: MembershipId,
        team_id: TeamId,
        status: MembershipStatus,
        user_id: Option<UserId>,
        contact: ContactDetails,
        invited_by: UserId,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        accepted_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            team_id,
            status,
            user_id,
            contact,
            invited_by,
            created_at,
            updated_at,
            accepted_at,
        }
    }

    // Getters

    pub fn id(&self) -> &MembershipId {
        &self.id
    }

    pub fn team_id(&self) -> &TeamId {
        &self.team_id
    }

    pub fn status(&self) -> MembershipStatus {
        self.status
    }

    pub fn user_id(&self) -> Option<&UserId> {
        self.user_id.as_ref()
    }

    pub fn contact(&self) -> &ContactDetails {
        &self.contact
    }

    /// The email identity this membership is keyed by while pending
    pub fn email(&self) -> &str {
        &self.contact.email
    }

    pub fn invited_by(&self) -> &UserId {
        &self.invited_by
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn accepted_at(&self) -> Option<DateTime<Utc>> {
        self.accepted_at
    }

    pub fn is_accepted(&self) -> bool {
        self.status.is_accepted()
    }

    /// Check whether the membership is an accepted link to the given user
    pub fn is_accepted_by(&self, user_id: &UserId) -> bool {
        self.is_accepted() && self.user_id.as_ref() == Some(user_id)
    }

    // Mutators

    /// Transition the membership to accepted and link the user
    ///
    /// Accepting twice is a Conflict; the transition is terminal.
    pub fn accept(&mut self, user_id: UserId) -> Result<(), DomainError> {
        if self.is_accepted() {
            return Err(DomainError::conflict(format!(
                "Membership '{}' is already accepted",
                self.id
            )));
        }

        let now = Utc::now();
        self.status = MembershipStatus::Accepted;
        self.user_id = Some(user_id);
        self.accepted_at = Some(now);
        self.updated_at = now;

        Ok(())
    }
}
