//! User repository trait

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::entity::{NewUser, User, UserId};
use crate::domain::DomainError;

/// Repository trait for user storage
///
/// Implementations must reject a `create` or `save` that would give a second
/// record the same username or email, reporting it as
/// [`DomainError::Duplicate`] with the offending field name.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Get a user by their ID
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError>;

    /// Get a user by their username
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Get a user by their email address
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Store a new user; the store assigns the id and marks it active
    async fn create(&self, user: NewUser) -> Result<User, DomainError>;

    /// Persist changes to an existing user
    async fn save(&self, user: &User) -> Result<User, DomainError>;

    /// Count all users, active or not
    async fn count(&self) -> Result<usize, DomainError>;

    /// Check if a username exists
    async fn exists_by_username(&self, username: &str) -> Result<bool, DomainError> {
        Ok(self.find_by_username(username).await?.is_some())
    }

    /// Check if an email exists
    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError> {
        Ok(self.find_by_email(email).await?.is_some())
    }
}
