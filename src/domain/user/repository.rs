//! User repository trait

use async_trait::async_trait;

use crate::domain::DomainError;

use super::entity::{User, UserId};

/// Repository for user persistence
#[async_trait]
pub trait UserRepository: Send + Sync + std::fmt::Debug {
    /// Get a user by ID
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Get a user by normalized email
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Create a new user, fails with Conflict if the email is taken
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Update an existing user
    async fn update(&self, user: &User) -> Result<User, DomainError>;

    /// Delete a user by ID, returns true if deleted
    async fn delete(&self, id: &UserId) -> Result<bool, DomainError>;

    /// Count registered users
    async fn count(&self) -> Result<usize, DomainError>;

    /// Record a successful login timestamp
    async fn record_login(&self, id: &UserId) -> Result<(), DomainError>;
}
