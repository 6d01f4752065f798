//! Team field validation

use thiserror::Error;

const MAX_NAME_LENGTH: usize = 100;
const MAX_DESCRIPTION_LENGTH: usize = 1000;

/// Validation errors for team fields
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TeamValidationError {
    #[error("Team name cannot be empty")]
    EmptyName,

    #[error("Team name cannot exceed {MAX_NAME_LENGTH} characters")]
    NameTooLong,

    #[error("Team description cannot exceed {MAX_DESCRIPTION_LENGTH} characters")]
    DescriptionTooLong,
}

/// Validate a team name
pub fn validate_team_name(name: &str) -> Result<(), TeamValidationError> {
    if name.trim().is_empty() {
        return Err(TeamValidationError::EmptyName);
    }

    if name.len() > MAX_NAME_LENGTH {
        return Err(TeamValidationError::NameTooLong);
    }

    Ok(())
}

/// Validate a team description
pub fn validate_team_description(description: &str) -> Result<(), TeamValidationError> {
    if description.len() > MAX_DESCRIPTION_LENGTH {
        return Err(TeamValidationError::DescriptionTooLong);
    }

    Ok(())
}
