//! User entity and identifier

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::normalize_email;

/// User identifier - a UUID string
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    /// Wrap an existing identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Registered user account
///
/// The identity collaborator consumed by the team subsystem. The email is
/// stored lowercased; it is the identity the invitation workflow reconciles
/// against at acceptance time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    email: String,
    #[serde(skip_serializing, default)]
    password_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    country_code: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Create a new user with a hashed password
    pub fn new(id: UserId, email: impl AsRef<str>, password_hash: impl Into<String>) -> Self {
        let now = Utc::now();

        Self {
            id,
            email: normalize_email(email.as_ref()),
            password_hash: password_hash.into(),
            name: None,
            nickname: None,
            phone_number: None,
            country_code: None,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        }
    }

    /// Set the display name (builder pattern)
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the nickname (builder pattern)
    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    /// Set the phone number and country code (builder pattern)
    pub fn with_phone(
        mut self,
        phone_number: impl Into<String>,
        country_code: impl Into<String>,
    ) -> Self {
        self.phone_number = Some(phone_number.into());
        self.country_code = Some(country_code.into());
        self
    }

    /// Restore an entity from persisted fields
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: UserId,
        email: String,
        password_hash: String,
        name: Option<String>,
        nickname: Option<String>,
        phone_number: Option<String>,
        country_code: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        last_login_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            email,
            password_hash,
            name,
            nickname,
            phone_number,
            country_code,
            created_at,
            updated_at,
            last_login_at,
        }
    }

    // Getters

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn nickname(&self) -> Option<&str> {
        self.nickname.as_deref()
    }

    pub fn phone_number(&self) -> Option<&str> {
        self.phone_number.as_deref()
    }

    pub fn country_code(&self) -> Option<&str> {
        self.country_code.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn last_login_at(&self) -> Option<DateTime<Utc>> {
        self.last_login_at
    }

    // Mutators

    /// Replace the password hash
    pub fn set_password_hash(&mut self, hash: impl Into<String>) {
        self.password_hash = hash.into();
        self.touch();
    }

    /// Record a successful login
    pub fn record_login(&mut self) {
        self.last_login_at = Some(Utc::now());
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_generate_is_unique() {
        assert_ne!(UserId::generate(), UserId::generate());
    }

    #[test]
    fn test_user_creation_normalizes_email() {
        let user = User::new(UserId::generate(), "Erin@Example.COM", "hash");
        assert_eq!(user.email(), "erin@example.com");
        assert!(user.last_login_at().is_none());
    }

    #[test]
    fn test_user_builder() {
        let user = User::new(UserId::generate(), "erin@example.com", "hash")
            .with_name("Erin")
            .with_nickname("E")
            .with_phone("5551234", "+44");

        assert_eq!(user.name(), Some("Erin"));
        assert_eq!(user.nickname(), Some("E"));
        assert_eq!(user.phone_number(), Some("5551234"));
        assert_eq!(user.country_code(), Some("+44"));
    }

    #[test]
    fn test_record_login() {
        let mut user = User::new(UserId::generate(), "erin@example.com", "hash");
        user.record_login();
        assert!(user.last_login_at().is_some());
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User::new(UserId::generate(), "erin@example.com", "secret-hash");
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
    }
}
