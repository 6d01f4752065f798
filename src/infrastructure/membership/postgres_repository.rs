//! PostgreSQL membership and invitation repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::membership::{
    ContactDetails, Invitation, InvitationId, Membership, MembershipId, MembershipRepository,
    MembershipStatus,
};
use crate::domain::team::TeamId;
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// PostgreSQL implementation of MembershipRepository
///
/// The UNIQUE (team_id, email) constraint on memberships is the race guard
/// for duplicate invites; both inserts run in one transaction.
#[derive(Debug, Clone)]
pub struct PostgresMembershipRepository {
    pool: PgPool,
}

impl PostgresMembershipRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const MEMBERSHIP_COLUMNS: &str = "id, team_id, status, user_id, name, email, phone_number, \
                                  country_code, nickname, invited_by, created_at, updated_at, \
                                  accepted_at";

const INVITATION_COLUMNS: &str = "id, team_id, membership_id, name, email, phone_number, \
                                  country_code, nickname, invited_by, created_at";

#[async_trait]
impl MembershipRepository for PostgresMembershipRepository {
    async fn create_invite(
        &self,
        membership: Membership,
        invitation: Invitation,
    ) -> Result<Invitation, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO memberships (id, team_id, status, user_id, name, email, phone_number,
                                     country_code, nickname, invited_by, created_at, updated_at,
                                     accepted_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(membership.id().as_str())
        .bind(membership.team_id().as_str())
        .bind(membership.status().to_string())
        .bind(membership.user_id().map(|u| u.as_str()))
        .bind(membership.contact().name.as_deref())
        .bind(membership.email())
        .bind(membership.contact().phone_number.as_deref())
        .bind(membership.contact().country_code.as_deref())
        .bind(membership.contact().nickname.as_deref())
        .bind(membership.invited_by().as_str())
        .bind(membership.created_at())
        .bind(membership.updated_at())
        .bind(membership.accepted_at())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            let msg = e.to_string();

            if msg.contains("duplicate key") || msg.contains("unique constraint") {
                DomainError::conflict(format!(
                    "A membership for '{}' already exists on this team",
                    membership.email()
                ))
            } else {
                DomainError::storage(format!("Failed to create membership: {}", e))
            }
        })?;

        sqlx::query(
            r#"
            INSERT INTO invitations (id, team_id, membership_id, name, email, phone_number,
                                     country_code, nickname, invited_by, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(invitation.id().as_str())
        .bind(invitation.team_id().as_str())
        .bind(invitation.membership_id().as_str())
        .bind(invitation.contact().name.as_deref())
        .bind(invitation.email())
        .bind(invitation.contact().phone_number.as_deref())
        .bind(invitation.contact().country_code.as_deref())
        .bind(invitation.contact().nickname.as_deref())
        .bind(invitation.invited_by().as_str())
        .bind(invitation.created_at())
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create invitation: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit invite: {}", e)))?;

        Ok(invitation)
    }

    async fn get_membership(&self, id: &MembershipId) -> Result<Option<Membership>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM memberships WHERE id = $1",
            MEMBERSHIP_COLUMNS
        ))
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get membership: {}", e)))?;

        row.map(|r| row_to_membership(&r)).transpose()
    }

    async fn get_invitation_in_team(
        &self,
        team_id: &TeamId,
        id: &InvitationId,
    ) -> Result<Option<Invitation>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM invitations WHERE id = $1 AND team_id = $2",
            INVITATION_COLUMNS
        ))
        .bind(id.as_str())
        .bind(team_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get invitation: {}", e)))?;

        Ok(row.map(|r| row_to_invitation(&r)))
    }

    async fn list_by_team(&self, team_id: &TeamId) -> Result<Vec<Membership>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM memberships WHERE team_id = $1 ORDER BY created_at ASC",
            MEMBERSHIP_COLUMNS
        ))
        .bind(team_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list memberships: {}", e)))?;

        rows.iter().map(row_to_membership).collect()
    }

    async fn list_by_user(
        &self,
        user_id: &UserId,
        status: Option<MembershipStatus>,
    ) -> Result<Vec<Membership>, DomainError> {
        let rows = match status {
            Some(status) => {
                sqlx::query(&format!(
                    "SELECT {} FROM memberships WHERE user_id = $1 AND status = $2 \
                     ORDER BY created_at ASC",
                    MEMBERSHIP_COLUMNS
                ))
                .bind(user_id.as_str())
                .bind(status.to_string())
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(&format!(
                    "SELECT {} FROM memberships WHERE user_id = $1 ORDER BY created_at ASC",
                    MEMBERSHIP_COLUMNS
                ))
                .bind(user_id.as_str())
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| DomainError::storage(format!("Failed to list memberships: {}", e)))?;

        rows.iter().map(row_to_membership).collect()
    }

    async fn find_by_team_and_email(
        &self,
        team_id: &TeamId,
        email: &str,
    ) -> Result<Option<Membership>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM memberships WHERE team_id = $1 AND email = $2",
            MEMBERSHIP_COLUMNS
        ))
        .bind(team_id.as_str())
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to find membership: {}", e)))?;

        row.map(|r| row_to_membership(&r)).transpose()
    }

    async fn update_membership(&self, membership: &Membership) -> Result<Membership, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE memberships
            SET status = $2, user_id = $3, updated_at = $4, accepted_at = $5
            WHERE id = $1
            "#,
        )
        .bind(membership.id().as_str())
        .bind(membership.status().to_string())
        .bind(membership.user_id().map(|u| u.as_str()))
        .bind(membership.updated_at())
        .bind(membership.accepted_at())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to update membership: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Membership '{}' not found",
                membership.id()
            )));
        }

        Ok(membership.clone())
    }

    async fn delete_by_team(&self, team_id: &TeamId) -> Result<usize, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        sqlx::query("DELETE FROM invitations WHERE team_id = $1")
            .bind(team_id.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete invitations: {}", e)))?;

        let result = sqlx::query("DELETE FROM memberships WHERE team_id = $1")
            .bind(team_id.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete memberships: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit cascade: {}", e)))?;

        Ok(result.rows_affected() as usize)
    }
}

fn parse_status(raw: &str) -> Result<MembershipStatus, DomainError> {
    match raw {
        "pending" => Ok(MembershipStatus::Pending),
        "accepted" => Ok(MembershipStatus::Accepted),
        other => Err(DomainError::storage(format!(
            "Unknown membership status '{}'",
            other
        ))),
    }
}

fn row_to_contact(row: &sqlx::postgres::PgRow) -> ContactDetails {
    let mut contact = ContactDetails::new(row.get::<String, _>("email"));
    contact.name = row.get("name");
    contact.phone_number = row.get("phone_number");
    contact.country_code = row.get("country_code");
    contact.nickname = row.get("nickname");
    contact
}

fn row_to_membership(row: &sqlx::postgres::PgRow) -> Result<Membership, DomainError> {
    Ok(Membership::from_parts(
        MembershipId::new(row.get::<String, _>("id")),
        TeamId::new(row.get::<String, _>("team_id")),
        parse_status(&row.get::<String, _>("status"))?,
        row.get::<Option<String>, _>("user_id").map(UserId::new),
        row_to_contact(row),
        UserId::new(row.get::<String, _>("invited_by")),
        row.get("created_at"),
        row.get("updated_at"),
        row.get("accepted_at"),
    ))
}

fn row_to_invitation(row: &sqlx::postgres::PgRow) -> Invitation {
    Invitation::from_parts(
        InvitationId::new(row.get::<String, _>("id")),
        TeamId::new(row.get::<String, _>("team_id")),
        MembershipId::new(row.get::<String, _>("membership_id")),
        row_to_contact(row),
        UserId::new(row.get::<String, _>("invited_by")),
        row.get("created_at"),
    )
}
