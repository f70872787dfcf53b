//! In-memory user repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::user::{NewUser, User, UserId, UserRepository, EMAIL_FIELD, USERNAME_FIELD};
use crate::domain::DomainError;

/// Records plus their secondary indexes, guarded by a single lock so that
/// uniqueness checks and writes happen atomically
#[derive(Debug, Default)]
struct UserTable {
    users: HashMap<UserId, User>,
    /// Index for username -> user ID lookup
    username_index: HashMap<String, UserId>,
    /// Index for email -> user ID lookup
    email_index: HashMap<String, UserId>,
    last_id: i64,
}

impl UserTable {
    fn held_by_other(index: &HashMap<String, UserId>, key: &str, id: Option<UserId>) -> bool {
        match index.get(key) {
            Some(owner) => Some(*owner) != id,
            None => false,
        }
    }
}

/// In-memory implementation of UserRepository
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    table: Arc<RwLock<UserTable>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let table = self.table.read().await;
        Ok(table.users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let table = self.table.read().await;

        Ok(table
            .username_index
            .get(username)
            .and_then(|id| table.users.get(id))
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let table = self.table.read().await;

        Ok(table
            .email_index
            .get(email)
            .and_then(|id| table.users.get(id))
            .cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let mut table = self.table.write().await;

        if UserTable::held_by_other(&table.username_index, &user.username, None) {
            return Err(DomainError::duplicate(USERNAME_FIELD, user.username));
        }

        if UserTable::held_by_other(&table.email_index, &user.email, None) {
            return Err(DomainError::duplicate(EMAIL_FIELD, user.email));
        }

        table.last_id += 1;
        let id = UserId::new(table.last_id);
        let user = User::from_new(id, user);

        table.username_index.insert(user.username().to_string(), id);
        table.email_index.insert(user.email().to_string(), id);
        table.users.insert(id, user.clone());

        debug!(user_id = %id, "Stored new user");
        Ok(user)
    }

    async fn save(&self, user: &User) -> Result<User, DomainError> {
        let mut table = self.table.write().await;
        let id = user.id();

        let (old_username, old_email) = match table.users.get(&id) {
            Some(old) => (old.username().to_string(), old.email().to_string()),
            None => return Err(DomainError::not_found(format!("User '{}' not found", id))),
        };

        if UserTable::held_by_other(&table.username_index, user.username(), Some(id)) {
            return Err(DomainError::duplicate(USERNAME_FIELD, user.username()));
        }

        if UserTable::held_by_other(&table.email_index, user.email(), Some(id)) {
            return Err(DomainError::duplicate(EMAIL_FIELD, user.email()));
        }

        if old_username != user.username() {
            table.username_index.remove(&old_username);
            table.username_index.insert(user.username().to_string(), id);
        }

        if old_email != user.email() {
            table.email_index.remove(&old_email);
            table.email_index.insert(user.email().to_string(), id);
        }

        table.users.insert(id, user.clone());

        Ok(user.clone())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let table = self.table.read().await;
        Ok(table.users.len())
    }
}
