//! Application state for shared services

use std::sync::Arc;

use crate::domain::{User, UserError, UserId, UserRepository};
use crate::infrastructure::user::{
    CreateUserRequest, PasswordHasher, UpdateUserRequest, UserService,
};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
}

impl AppState {
    pub fn new(user_service: Arc<dyn UserServiceTrait>) -> Self {
        Self { user_service }
    }
}

/// Trait for user service operations
#[async_trait::async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn register(&self, request: CreateUserRequest) -> Result<User, UserError>;
    async fn get_by_id(&self, id: UserId) -> Result<User, UserError>;
    async fn get_by_username(&self, username: &str) -> Result<User, UserError>;
    async fn update(&self, id: UserId, request: UpdateUserRequest) -> Result<User, UserError>;
    async fn delete(&self, id: UserId) -> Result<(), UserError>;
    async fn count(&self) -> Result<usize, UserError>;
}

#[async_trait::async_trait]
impl<R, H> UserServiceTrait for UserService<R, H>
where
    R: UserRepository + 'static,
    H: PasswordHasher + 'static,
{
    async fn register(&self, request: CreateUserRequest) -> Result<User, UserError> {
        UserService::register(self, request).await
    }

    async fn get_by_id(&self, id: UserId) -> Result<User, UserError> {
        UserService::get_by_id(self, id).await
    }

    async fn get_by_username(&self, username: &str) -> Result<User, UserError> {
        UserService::get_by_username(self, username).await
    }

    async fn update(&self, id: UserId, request: UpdateUserRequest) -> Result<User, UserError> {
        UserService::update(self, id, request).await
    }

    async fn delete(&self, id: UserId) -> Result<(), UserError> {
        UserService::delete(self, id).await
    }

    async fn count(&self) -> Result<usize, UserError> {
        UserService::count(self).await
    }
}
