//! User domain
//!
//! This module provides domain types and traits for user registration,
//! including user entities, validation, workflow errors and the repository trait.

mod entity;
mod error;
mod repository;
mod validation;

pub use entity::{NewUser, User, UserId};
pub use error::{UserError, UserLookup, EMAIL_FIELD, USERNAME_FIELD};
pub use repository::UserRepository;
pub use validation::{
    validate_email, validate_password, validate_username, UserValidationError,
    MIN_PASSWORD_LENGTH, MIN_USERNAME_LENGTH,
};

#[cfg(test)]
pub use repository::MockUserRepository;
