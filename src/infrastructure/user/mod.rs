//! User infrastructure module
//!
//! This module provides implementations for user registration and management,
//! including the password encoder, in-memory and PostgreSQL repositories, and
//! the user service.

mod password;
mod postgres_repository;
mod repository;
mod service;

pub use password::{PasswordEncoder, PasswordHasher, ENCODED_PREFIX, SPECIAL_CHARACTERS};
pub use postgres_repository::PostgresUserRepository;
pub use repository::InMemoryUserRepository;
pub use service::{CreateUserRequest, UpdateUserRequest, UserService};
