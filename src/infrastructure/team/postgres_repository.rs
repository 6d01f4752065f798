//! PostgreSQL team repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::team::{Team, TeamId, TeamRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// PostgreSQL implementation of TeamRepository
#[derive(Debug, Clone)]
pub struct PostgresTeamRepository {
    pool: PgPool,
}

impl PostgresTeamRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const TEAM_COLUMNS: &str = "id, name, description, owner_id, created_at, updated_at";

#[async_trait]
impl TeamRepository for PostgresTeamRepository {
    async fn get(&self, id: &TeamId) -> Result<Option<Team>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM teams WHERE id = $1", TEAM_COLUMNS))
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get team: {}", e)))?;

        Ok(row.map(|r| row_to_team(&r)))
    }

    async fn create(&self, team: Team) -> Result<Team, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO teams (id, name, description, owner_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(team.id().as_str())
        .bind(team.name())
        .bind(team.description())
        .bind(team.owner_id().as_str())
        .bind(team.created_at())
        .bind(team.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let msg = e.to_string();

            if msg.contains("duplicate key") || msg.contains("unique constraint") {
                DomainError::conflict(format!("Team '{}' already exists", team.id()))
            } else {
                DomainError::storage(format!("Failed to create team: {}", e))
            }
        })?;

        Ok(team)
    }

    async fn delete(&self, id: &TeamId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete team: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_by_owner(&self, owner_id: &UserId) -> Result<Vec<Team>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM teams WHERE owner_id = $1 ORDER BY created_at ASC",
            TEAM_COLUMNS
        ))
        .bind(owner_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list teams: {}", e)))?;

        Ok(rows.iter().map(row_to_team).collect())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM teams")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count teams: {}", e)))?;

        Ok(count as usize)
    }
}

fn row_to_team(row: &sqlx::postgres::PgRow) -> Team {
    Team::from_parts(
        TeamId::new(row.get::<String, _>("id")),
        row.get("name"),
        row.get("description"),
        UserId::new(row.get::<String, _>("owner_id")),
        row.get("created_at"),
        row.get("updated_at"),
    )
}
