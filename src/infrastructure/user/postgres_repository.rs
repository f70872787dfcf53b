//! PostgreSQL user repository implementation

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use tracing::{debug, info};

use crate::config::StorageConfig;

use crate::domain::user::{NewUser, User, UserId, UserRepository, EMAIL_FIELD, USERNAME_FIELD};
use crate::domain::DomainError;
use crate::infrastructure::storage::migrations::{
    run_user_migrations, USERS_EMAIL_CONSTRAINT, USERS_USERNAME_CONSTRAINT,
};

const USER_COLUMNS: &str = "id, username, email, password_hash, active, created_at, updated_at";

/// PostgreSQL implementation of UserRepository
///
/// Uniqueness of username and email is enforced by table constraints, so
/// concurrent writers cannot both succeed with the same value.
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect using the storage settings and bring the schema up to date
    pub async fn connect(config: &StorageConfig) -> Result<Self, DomainError> {
        let url = config.require_database_url()?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(url)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))?;

        run_user_migrations(&pool).await?;
        info!("PostgreSQL user store ready");

        Ok(Self::new(pool))
    }

    async fn find_one(&self, column: &str, value: &str) -> Result<Option<User>, DomainError> {
        let sql = format!("SELECT {} FROM users WHERE {} = $1", USER_COLUMNS, column);

        let row = sqlx::query(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get user by {}: {}", column, e)))?;

        row.as_ref().map(row_to_user).transpose()
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);

        let row = sqlx::query(&sql)
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        self.find_one("username", username).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.find_one("email", email).await
    }

    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let sql = format!(
            r#"
            INSERT INTO users (username, email, password_hash, active, created_at, updated_at)
            VALUES ($1, $2, $3, TRUE, NOW(), NOW())
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_write_error(e, &user.username, &user.email, "create"))?;

        let created = row_to_user(&row)?;
        debug!(user_id = %created.id(), "Inserted user row");

        Ok(created)
    }

    async fn save(&self, user: &User) -> Result<User, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET username = $2, email = $3, password_hash = $4, active = $5, updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(user.id().value())
        .bind(user.username())
        .bind(user.email())
        .bind(user.password_hash())
        .bind(user.is_active())
        .bind(user.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, user.username(), user.email(), "update"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "User '{}' not found",
                user.id()
            )));
        }

        Ok(user.clone())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count users: {}", e)))?;

        Ok(count as usize)
    }
}

/// Translate unique-constraint violations into `DomainError::Duplicate`
fn map_write_error(err: sqlx::Error, username: &str, email: &str, action: &str) -> DomainError {
    let constraint = err
        .as_database_error()
        .and_then(|db| db.constraint())
        .map(str::to_string);

    match duplicate_field(constraint.as_deref()) {
        Some(field) if field == USERNAME_FIELD => DomainError::duplicate(field, username),
        Some(field) => DomainError::duplicate(field, email),
        None => DomainError::storage(format!("Failed to {} user: {}", action, err)),
    }
}

fn duplicate_field(constraint: Option<&str>) -> Option<&'static str> {
    match constraint? {
        USERS_USERNAME_CONSTRAINT => Some(USERNAME_FIELD),
        USERS_EMAIL_CONSTRAINT => Some(EMAIL_FIELD),
        _ => None,
    }
}

fn row_to_user(row: &sqlx::postgres::PgRow) -> Result<User, DomainError> {
    let read = |e: sqlx::Error| DomainError::storage(format!("Invalid user row: {}", e));

    Ok(User::restore(
        UserId::new(row.try_get("id").map_err(read)?),
        row.try_get::<String, _>("username").map_err(read)?,
        row.try_get::<String, _>("email").map_err(read)?,
        row.try_get::<String, _>("password_hash").map_err(read)?,
        row.try_get("active").map_err(read)?,
        row.try_get("created_at").map_err(read)?,
        row.try_get("updated_at").map_err(read)?,
    ))
}
