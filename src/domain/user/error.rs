//! User workflow error types

use thiserror::Error;

use super::entity::UserId;
use super::validation::UserValidationError;
use crate::domain::DomainError;

/// Store field names reported in `DomainError::Duplicate`
pub const USERNAME_FIELD: &str = "username";
pub const EMAIL_FIELD: &str = "email";

/// Key a failed lookup was made with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserLookup {
    Id(UserId),
    Username(String),
}

impl std::fmt::Display for UserLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id: {}", id),
            Self::Username(username) => write!(f, "username: {}", username),
        }
    }
}

/// Errors returned by user registration and management operations
#[derive(Debug, Error)]
pub enum UserError {
    #[error(transparent)]
    Validation(#[from] UserValidationError),

    #[error("Username already exists")]
    DuplicateUsername,

    #[error("Email already exists")]
    DuplicateEmail,

    #[error("User not found with {0}")]
    NotFound(UserLookup),

    #[error(transparent)]
    Store(DomainError),
}

impl UserError {
    pub fn not_found_id(id: UserId) -> Self {
        Self::NotFound(UserLookup::Id(id))
    }

    pub fn not_found_username(username: impl Into<String>) -> Self {
        Self::NotFound(UserLookup::Username(username.into()))
    }

    /// Stable machine-readable tag for the error
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(UserValidationError::EmptyUsername) => "empty_username",
            Self::Validation(UserValidationError::UsernameTooShort(_)) => "username_too_short",
            Self::Validation(UserValidationError::InvalidEmail) => "invalid_email",
            Self::Validation(UserValidationError::PasswordTooShort(_)) => "password_too_short",
            Self::DuplicateUsername => "duplicate_username",
            Self::DuplicateEmail => "duplicate_email",
            Self::NotFound(_) => "not_found",
            Self::Store(_) => "storage_error",
        }
    }

    /// Whether the caller caused the error (as opposed to the store failing)
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Store(_))
    }
}

impl From<DomainError> for UserError {
    /// Uniqueness violations detected by the store itself keep their tag
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Duplicate { ref field, .. } if field == USERNAME_FIELD => {
                Self::DuplicateUsername
            }
            DomainError::Duplicate { ref field, .. } if field == EMAIL_FIELD => {
                Self::DuplicateEmail
            }
            other => Self::Store(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_messages() {
        assert_eq!(
            UserError::not_found_id(UserId::new(9)).to_string(),
            "User not found with id: 9"
        );
        assert_eq!(
            UserError::not_found_username("ghost").to_string(),
            "User not found with username: ghost"
        );
    }

    #[test]
    fn test_validation_message_is_transparent() {
        let err = UserError::from(UserValidationError::InvalidEmail);
        assert_eq!(err.to_string(), "Invalid email format");
        assert_eq!(err.code(), "invalid_email");
    }

    #[test]
    fn test_store_duplicate_maps_to_tag() {
        let err = UserError::from(DomainError::duplicate(USERNAME_FIELD, "bob"));
        assert!(matches!(err, UserError::DuplicateUsername));

        let err = UserError::from(DomainError::duplicate(EMAIL_FIELD, "bob@x.io"));
        assert!(matches!(err, UserError::DuplicateEmail));
    }

    #[test]
    fn test_other_store_errors_stay_store_errors() {
        let err = UserError::from(DomainError::storage("disk full"));
        assert!(matches!(err, UserError::Store(_)));
        assert!(!err.is_client_error());
        assert_eq!(err.code(), "storage_error");
    }

    #[test]
    fn test_codes() {
        assert_eq!(
            UserError::from(UserValidationError::EmptyUsername).code(),
            "empty_username"
        );
        assert_eq!(
            UserError::from(UserValidationError::UsernameTooShort(3)).code(),
            "username_too_short"
        );
        assert_eq!(
            UserError::from(UserValidationError::PasswordTooShort(6)).code(),
            "password_too_short"
        );
        assert_eq!(UserError::DuplicateUsername.code(), "duplicate_username");
        assert_eq!(UserError::DuplicateEmail.code(), "duplicate_email");
        assert_eq!(UserError::not_found_id(UserId::new(1)).code(), "not_found");
    }
}
