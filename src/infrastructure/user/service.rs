//! User service for registration and user management

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::user::{
    validate_email, validate_password, validate_username, NewUser, User, UserError, UserId,
    UserRepository,
};

use super::password::PasswordHasher;

/// Request for registering a new user
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Request for updating a user's details. The password cannot be changed here.
#[derive(Debug, Clone)]
pub struct UpdateUserRequest {
    pub username: String,
    pub email: String,
    pub active: bool,
}

/// User service for registration and management
#[derive(Debug)]
pub struct UserService<R: UserRepository, H: PasswordHasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
}

impl<R: UserRepository, H: PasswordHasher> UserService<R, H> {
    /// Create a new user service
    pub fn new(repository: Arc<R>, hasher: Arc<H>) -> Self {
        Self { repository, hasher }
    }

    /// Register a new user
    ///
    /// Rules are checked in order and the first failure is returned:
    /// username present, username length, username free, email shape,
    /// email free, password length. Nothing is written unless all pass.
    pub async fn register(&self, request: CreateUserRequest) -> Result<User, UserError> {
        let result = self.check_registration(&request).await;

        if let Err(e) = &result {
            warn!(username = %request.username, code = e.code(), "Registration rejected");
        }
        result?;

        let password_hash = self.hasher.hash(&request.password)?;

        let user = self
            .repository
            .create(NewUser {
                username: request.username,
                email: request.email,
                password_hash,
            })
            .await?;

        info!(user_id = %user.id(), username = %user.username(), "Registered user");
        Ok(user)
    }

    async fn check_registration(&self, request: &CreateUserRequest) -> Result<(), UserError> {
        validate_username(&request.username)?;

        if self.repository.exists_by_username(&request.username).await? {
            return Err(UserError::DuplicateUsername);
        }

        validate_email(&request.email)?;

        if self.repository.exists_by_email(&request.email).await? {
            return Err(UserError::DuplicateEmail);
        }

        validate_password(&request.password)?;

        Ok(())
    }

    /// Get a user by ID
    pub async fn get_by_id(&self, id: UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| UserError::not_found_id(id))
    }

    /// Get a user by username
    pub async fn get_by_username(&self, username: &str) -> Result<User, UserError> {
        self.repository
            .find_by_username(username)
            .await?
            .ok_or_else(|| UserError::not_found_username(username))
    }

    /// Update email, username and active flag of an existing user
    pub async fn update(&self, id: UserId, request: UpdateUserRequest) -> Result<User, UserError> {
        let mut user = self.get_by_id(id).await?;

        if user.email() != request.email {
            let holder = self.repository.find_by_email(&request.email).await?;

            if holder.is_some_and(|other| other.id() != id) {
                return Err(UserError::DuplicateEmail);
            }
        }

        if user.username() != request.username {
            let holder = self.repository.find_by_username(&request.username).await?;

            if holder.is_some_and(|other| other.id() != id) {
                return Err(UserError::DuplicateUsername);
            }
        }

        user.set_email(request.email);
        user.set_username(request.username);
        user.set_active(request.active);

        let saved = self.repository.save(&user).await?;
        debug!(user_id = %id, "Updated user");

        Ok(saved)
    }

    /// Soft delete a user: the record is kept and marked inactive
    pub async fn delete(&self, id: UserId) -> Result<(), UserError> {
        let mut user = self.get_by_id(id).await?;

        user.deactivate();
        self.repository.save(&user).await?;

        info!(user_id = %id, "Deactivated user");
        Ok(())
    }

    /// Count stored users, active or not
    pub async fn count(&self) -> Result<usize, UserError> {
        Ok(self.repository.count().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::{MockUserRepository, UserValidationError};
    use crate::domain::DomainError;
    use crate::infrastructure::user::password::PasswordEncoder;
    use crate::infrastructure::user::repository::InMemoryUserRepository;

    fn create_service() -> UserService<InMemoryUserRepository, PasswordEncoder> {
        let repository = Arc::new(InMemoryUserRepository::new());
        let hasher = Arc::new(PasswordEncoder::new());
        UserService::new(repository, hasher)
    }

    fn make_request(username: &str, email: &str, password: &str) -> CreateUserRequest {
        CreateUserRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn update_request(username: &str, email: &str, active: bool) -> UpdateUserRequest {
        UpdateUserRequest {
            username: username.to_string(),
            email: email.to_string(),
            active,
        }
    }

    #[tokio::test]
    async fn test_register_user() {
        let service = create_service();

        let user = service
            .register(make_request("alice", "alice@example.com", "secret1"))
            .await
            .unwrap();

        assert_eq!(user.id(), UserId::new(1));
        assert_eq!(user.username(), "alice");
        assert_eq!(user.email(), "alice@example.com");
        assert!(user.is_active());
        assert_eq!(user.password_hash(), PasswordEncoder::new().encode_password("secret1"));
    }

    #[tokio::test]
    async fn test_register_username_too_short() {
        let service = create_service();

        let result = service
            .register(make_request("ab", "ab@example.com", "secret1"))
            .await;

        assert!(matches!(
            result,
            Err(UserError::Validation(UserValidationError::UsernameTooShort(3)))
        ));
    }

    #[tokio::test]
    async fn test_register_empty_username() {
        let service = create_service();

        for username in ["", "    "] {
            let result = service
                .register(make_request(username, "x@example.com", "secret1"))
                .await;

            assert!(matches!(
                result,
                Err(UserError::Validation(UserValidationError::EmptyUsername))
            ));
        }
    }

    #[tokio::test]
    async fn test_register_invalid_email() {
        let service = create_service();

        let result = service
            .register(make_request("alice", "not-an-email", "secret1"))
            .await;
        assert!(matches!(
            result,
            Err(UserError::Validation(UserValidationError::InvalidEmail))
        ));

        // Shape-only check
        assert!(service
            .register(make_request("alice", "a@b", "secret1"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let service = create_service();

        service
            .register(make_request("alice", "alice@example.com", "secret1"))
            .await
            .unwrap();

        let result = service
            .register(make_request("alice", "other@example.com", "secret1"))
            .await;
        assert!(matches!(result, Err(UserError::DuplicateUsername)));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let service = create_service();

        service
            .register(make_request("alice", "alice@example.com", "secret1"))
            .await
            .unwrap();

        let result = service
            .register(make_request("bob", "alice@example.com", "secret1"))
            .await;
        assert!(matches!(result, Err(UserError::DuplicateEmail)));
    }

    #[tokio::test]
    async fn test_register_password_length() {
        let service = create_service();

        let result = service
            .register(make_request("alice", "alice@example.com", "short"))
            .await;
        assert!(matches!(
            result,
            Err(UserError::Validation(UserValidationError::PasswordTooShort(6)))
        ));

        assert!(service
            .register(make_request("alice", "alice@example.com", "longer1"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_register_first_failing_rule_wins() {
        let service = create_service();

        // Short username is reported before the bad email and short password
        let result = service.register(make_request("ab", "bad", "x")).await;
        assert!(matches!(
            result,
            Err(UserError::Validation(UserValidationError::UsernameTooShort(_)))
        ));

        // Taken username is reported before the bad email
        service
            .register(make_request("alice", "alice@example.com", "secret1"))
            .await
            .unwrap();
        let result = service.register(make_request("alice", "bad", "x")).await;
        assert!(matches!(result, Err(UserError::DuplicateUsername)));

        // Taken email is reported before the short password
        let result = service
            .register(make_request("bob", "alice@example.com", "x"))
            .await;
        assert!(matches!(result, Err(UserError::DuplicateEmail)));
    }

    #[tokio::test]
    async fn test_register_failure_writes_nothing() {
        let mut repository = MockUserRepository::new();
        repository
            .expect_exists_by_username()
            .returning(|_| Ok(false));
        repository.expect_exists_by_email().returning(|_| Ok(false));
        repository.expect_create().never();

        let service = UserService::new(Arc::new(repository), Arc::new(PasswordEncoder::new()));

        let result = service
            .register(make_request("alice", "alice@example.com", "short"))
            .await;
        assert!(matches!(
            result,
            Err(UserError::Validation(UserValidationError::PasswordTooShort(6)))
        ));
    }

    #[tokio::test]
    async fn test_register_success_writes_once() {
        let mut repository = MockUserRepository::new();
        repository
            .expect_exists_by_username()
            .withf(|username| username == "alice")
            .times(1)
            .returning(|_| Ok(false));
        repository
            .expect_exists_by_email()
            .withf(|email| email == "alice@example.com")
            .times(1)
            .returning(|_| Ok(false));
        repository
            .expect_create()
            .times(1)
            .returning(|new_user| Ok(User::from_new(UserId::new(10), new_user)));

        let service = UserService::new(Arc::new(repository), Arc::new(PasswordEncoder::new()));

        let user = service
            .register(make_request("alice", "alice@example.com", "secret1"))
            .await
            .unwrap();
        assert_eq!(user.id(), UserId::new(10));
    }

    #[tokio::test]
    async fn test_register_store_race_maps_to_duplicate() {
        let mut repository = MockUserRepository::new();
        repository
            .expect_exists_by_username()
            .returning(|_| Ok(false));
        repository.expect_exists_by_email().returning(|_| Ok(false));
        repository
            .expect_create()
            .returning(|new_user| Err(DomainError::duplicate("email", new_user.email)));

        let service = UserService::new(Arc::new(repository), Arc::new(PasswordEncoder::new()));

        let result = service
            .register(make_request("alice", "alice@example.com", "secret1"))
            .await;
        assert!(matches!(result, Err(UserError::DuplicateEmail)));
    }

    #[tokio::test]
    async fn test_register_store_failure() {
        let mut repository = MockUserRepository::new();
        repository
            .expect_exists_by_username()
            .returning(|_| Err(DomainError::storage("connection refused")));

        let service = UserService::new(Arc::new(repository), Arc::new(PasswordEncoder::new()));

        let result = service
            .register(make_request("alice", "alice@example.com", "secret1"))
            .await;
        assert!(matches!(result, Err(UserError::Store(DomainError::Storage { .. }))));
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let service = create_service();

        let result = service.get_by_id(UserId::new(404)).await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
        assert_eq!(
            result.unwrap_err().to_string(),
            "User not found with id: 404"
        );
    }

    #[tokio::test]
    async fn test_get_by_username() {
        let service = create_service();
        let created = service
            .register(make_request("alice", "alice@example.com", "secret1"))
            .await
            .unwrap();

        let found = service.get_by_username("alice").await.unwrap();
        assert_eq!(found.id(), created.id());

        let result = service.get_by_username("nobody").await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "User not found with username: nobody"
        );
    }

    #[tokio::test]
    async fn test_update_username_only_keeps_own_email() {
        let service = create_service();
        let user = service
            .register(make_request("alice", "alice@example.com", "secret1"))
            .await
            .unwrap();

        let updated = service
            .update(user.id(), update_request("alicia", "alice@example.com", true))
            .await
            .unwrap();

        assert_eq!(updated.id(), user.id());
        assert_eq!(updated.username(), "alicia");
        assert_eq!(updated.email(), "alice@example.com");
        assert_eq!(updated.password_hash(), user.password_hash());
    }

    #[tokio::test]
    async fn test_update_email_taken_by_other_user() {
        let service = create_service();
        service
            .register(make_request("alice", "alice@example.com", "secret1"))
            .await
            .unwrap();
        let bob = service
            .register(make_request("bob", "bob@example.com", "secret1"))
            .await
            .unwrap();

        let result = service
            .update(bob.id(), update_request("bob", "alice@example.com", true))
            .await;
        assert!(matches!(result, Err(UserError::DuplicateEmail)));

        let unchanged = service.get_by_id(bob.id()).await.unwrap();
        assert_eq!(unchanged.email(), "bob@example.com");
    }

    #[tokio::test]
    async fn test_update_username_taken_by_other_user() {
        let service = create_service();
        service
            .register(make_request("alice", "alice@example.com", "secret1"))
            .await
            .unwrap();
        let bob = service
            .register(make_request("bob", "bob@example.com", "secret1"))
            .await
            .unwrap();

        let result = service
            .update(bob.id(), update_request("alice", "bob@example.com", true))
            .await;
        assert!(matches!(result, Err(UserError::DuplicateUsername)));
    }

    #[tokio::test]
    async fn test_update_sets_active_flag() {
        let service = create_service();
        let user = service
            .register(make_request("alice", "alice@example.com", "secret1"))
            .await
            .unwrap();

        let updated = service
            .update(user.id(), update_request("alice", "new@example.com", false))
            .await
            .unwrap();

        assert!(!updated.is_active());
        assert_eq!(updated.email(), "new@example.com");
        assert_eq!(
            service.get_by_username("alice").await.unwrap().email(),
            "new@example.com"
        );
    }

    #[tokio::test]
    async fn test_update_not_found() {
        let service = create_service();

        let result = service
            .update(UserId::new(5), update_request("alice", "a@b.com", true))
            .await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_is_soft() {
        let service = create_service();
        let user = service
            .register(make_request("alice", "alice@example.com", "secret1"))
            .await
            .unwrap();

        service.delete(user.id()).await.unwrap();

        let retrieved = service.get_by_id(user.id()).await.unwrap();
        assert!(!retrieved.is_active());
        assert_eq!(retrieved.username(), "alice");
        assert_eq!(service.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_deleted_user_still_holds_username_and_email() {
        let service = create_service();
        let user = service
            .register(make_request("alice", "alice@example.com", "secret1"))
            .await
            .unwrap();
        service.delete(user.id()).await.unwrap();

        let result = service
            .register(make_request("alice", "fresh@example.com", "secret1"))
            .await;
        assert!(matches!(result, Err(UserError::DuplicateUsername)));

        let result = service
            .register(make_request("fresh", "alice@example.com", "secret1"))
            .await;
        assert!(matches!(result, Err(UserError::DuplicateEmail)));
    }

    #[tokio::test]
    async fn test_delete_not_found() {
        let service = create_service();

        let result = service.delete(UserId::new(1)).await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }
}
