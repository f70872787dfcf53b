//! User Registry
//!
//! Registration, lookup, update and soft deletion of user accounts with:
//! - Ordered validation of usernames, emails and passwords
//! - Unique usernames and emails enforced by the store
//! - In-memory or PostgreSQL persistence
//! - An HTTP API and a small CLI

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use tracing::info;

use api::state::AppState;
use config::StorageBackend;
use infrastructure::user::{
    InMemoryUserRepository, PasswordEncoder, PostgresUserRepository, UserService,
};

/// Create application state backed by the configured user store
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    match config.storage.backend {
        StorageBackend::Memory => {
            info!("Using in-memory user store");
            Ok(create_in_memory_state())
        }
        StorageBackend::Postgres => {
            info!("Using PostgreSQL user store");
            let repository = PostgresUserRepository::connect(&config.storage).await?;
            let service = UserService::new(Arc::new(repository), Arc::new(PasswordEncoder::new()));

            Ok(AppState::new(Arc::new(service)))
        }
    }
}

/// Create application state with an empty in-memory user store
pub fn create_in_memory_state() -> AppState {
    let repository = InMemoryUserRepository::new();
    let service = UserService::new(Arc::new(repository), Arc::new(PasswordEncoder::new()));

    AppState::new(Arc::new(service))
}
