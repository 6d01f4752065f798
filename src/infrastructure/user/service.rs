//! User service - registration and authentication

use std::sync::Arc;

use tracing::info;

use crate::domain::user::{
    normalize_email, validate_email, validate_password, User, UserId, UserRepository,
};
use crate::domain::DomainError;

use super::password::PasswordHasher;

/// Request for registering a new user
#[derive(Debug, Clone)]
pub struct RegisterUserRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
    pub nickname: Option<String>,
    pub phone_number: Option<String>,
    pub country_code: Option<String>,
}

/// User service for registration and authentication
#[derive(Debug)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl UserService {
    /// Create a new user service
    pub fn new(repository: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { repository, hasher }
    }

    /// Register a new user
    pub async fn register(&self, request: RegisterUserRequest) -> Result<User, DomainError> {
        validate_email(&request.email).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_password(&request.password)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let email = normalize_email(&request.email);

        if self.repository.get_by_email(&email).await?.is_some() {
            return Err(DomainError::conflict(format!(
                "Email '{}' is already registered",
                email
            )));
        }

        let password_hash = self.hasher.hash(&request.password)?;

        let mut user = User::new(UserId::generate(), &email, password_hash);

        if let Some(name) = request.name {
            user = user.with_name(name);
        }

        if let Some(nickname) = request.nickname {
            user = user.with_nickname(nickname);
        }

        if let (Some(phone), Some(country)) = (request.phone_number, request.country_code) {
            user = user.with_phone(phone, country);
        }

        let user = self.repository.create(user).await?;

        info!(user_id = %user.id(), "Registered user");

        Ok(user)
    }

    /// Authenticate a user with email and password
    ///
    /// Returns None on unknown email or wrong password; the caller decides
    /// how to surface that without leaking which one failed.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, DomainError> {
        let email = normalize_email(email);

        let user = match self.repository.get_by_email(&email).await? {
            Some(u) => u,
            None => return Ok(None),
        };

        if !self.hasher.verify(password, user.password_hash()) {
            return Ok(None);
        }

        self.repository.record_login(user.id()).await?;

        // Re-fetch to pick up the login timestamp
        self.repository.get(user.id()).await
    }

    /// Get a user by ID
    pub async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        self.repository.get(id).await
    }

    /// Get a user by email
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.repository.get_by_email(&normalize_email(email)).await
    }

    /// Count registered users
    pub async fn count(&self) -> Result<usize, DomainError> {
        self.repository.count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::user::password::Argon2Hasher;
    use crate::infrastructure::user::repository::InMemoryUserRepository;

    fn create_service() -> UserService {
        UserService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(Argon2Hasher::new()),
        )
    }

    fn make_request(email: &str, password: &str) -> RegisterUserRequest {
        RegisterUserRequest {
            email: email.to_string(),
            password: password.to_string(),
            name: None,
            nickname: None,
            phone_number: None,
            country_code: None,
        }
    }

    #[tokio::test]
    async fn test_register() {
        let service = create_service();

        let user = service
            .register(make_request("erin@x.com", "secure_password123"))
            .await
            .unwrap();

        assert_eq!(user.email(), "erin@x.com");
        assert!(user.last_login_at().is_none());
    }

    #[tokio::test]
    async fn test_register_normalizes_email() {
        let service = create_service();

        let user = service
            .register(make_request("Erin@X.COM", "secure_password123"))
            .await
            .unwrap();

        assert_eq!(user.email(), "erin@x.com");
    }

    #[tokio::test]
    async fn test_register_invalid_email() {
        let service = create_service();

        let result = service
            .register(make_request("not-an-email", "secure_password123"))
            .await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_register_short_password() {
        let service = create_service();

        let result = service.register(make_request("erin@x.com", "short")).await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let service = create_service();

        service
            .register(make_request("erin@x.com", "secure_password123"))
            .await
            .unwrap();

        // Same address in different case still collides
        let result = service
            .register(make_request("ERIN@x.com", "other_password456"))
            .await;

        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let service = create_service();

        service
            .register(make_request("erin@x.com", "secure_password123"))
            .await
            .unwrap();

        let user = service
            .authenticate("erin@x.com", "secure_password123")
            .await
            .unwrap();

        assert!(user.is_some());
        assert!(user.unwrap().last_login_at().is_some());
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password() {
        let service = create_service();

        service
            .register(make_request("erin@x.com", "secure_password123"))
            .await
            .unwrap();

        let user = service
            .authenticate("erin@x.com", "wrong_password")
            .await
            .unwrap();

        assert!(user.is_none());
    }

    #[tokio::test]
    async fn test_authenticate_unknown_email() {
        let service = create_service();

        let user = service
            .authenticate("nobody@x.com", "password123")
            .await
            .unwrap();

        assert!(user.is_none());
    }

    #[tokio::test]
    async fn test_register_with_profile_fields() {
        let service = create_service();

        let request = RegisterUserRequest {
            email: "erin@x.com".to_string(),
            password: "secure_password123".to_string(),
            name: Some("Erin".to_string()),
            nickname: Some("E".to_string()),
            phone_number: Some("5551234".to_string()),
            country_code: Some("+44".to_string()),
        };

        let user = service.register(request).await.unwrap();

        assert_eq!(user.name(), Some("Erin"));
        assert_eq!(user.nickname(), Some("E"));
        assert_eq!(user.phone_number(), Some("5551234"));
        assert_eq!(user.country_code(), Some("+44"));
    }
}
