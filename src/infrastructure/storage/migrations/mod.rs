//! Versioned schema migrations for the PostgreSQL user store

use sqlx::postgres::PgPool;
use tracing::{debug, info};

use crate::domain::DomainError;

/// Unique constraint guarding `users.username`
pub const USERS_USERNAME_CONSTRAINT: &str = "users_username_key";
/// Unique constraint guarding `users.email`
pub const USERS_EMAIL_CONSTRAINT: &str = "users_email_key";

const CREATE_MIGRATIONS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS _migrations (
        version BIGINT PRIMARY KEY,
        description TEXT NOT NULL,
        installed_on TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
"#;

#[derive(Debug, Clone)]
pub struct Migration {
    pub version: i64,
    pub description: &'static str,
    pub sql: String,
}

/// Applies migrations in version order, each in its own transaction, and
/// records them in `_migrations`
#[derive(Debug)]
pub struct PostgresMigrator {
    pool: PgPool,
}

impl PostgresMigrator {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply every migration not yet recorded. Returns how many ran.
    pub async fn run_pending(&self, migrations: &[Migration]) -> Result<usize, DomainError> {
        sqlx::raw_sql(CREATE_MIGRATIONS_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to create migrations table: {}", e)))?;

        let applied: Vec<i64> = sqlx::query_scalar("SELECT version FROM _migrations")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to read migrations: {}", e)))?;

        let mut ran = 0;
        for migration in migrations {
            if applied.contains(&migration.version) {
                debug!(version = migration.version, "Migration already applied");
                continue;
            }

            self.apply(migration).await?;
            ran += 1;
        }

        Ok(ran)
    }

    async fn apply(&self, migration: &Migration) -> Result<(), DomainError> {
        let failed = |e: sqlx::Error| {
            DomainError::storage(format!("Migration {} failed: {}", migration.version, e))
        };

        let mut tx = self.pool.begin().await.map_err(failed)?;

        sqlx::raw_sql(&migration.sql)
            .execute(&mut *tx)
            .await
            .map_err(failed)?;

        sqlx::query("INSERT INTO _migrations (version, description) VALUES ($1, $2)")
            .bind(migration.version)
            .bind(migration.description)
            .execute(&mut *tx)
            .await
            .map_err(failed)?;

        tx.commit().await.map_err(failed)?;

        info!(version = migration.version, description = migration.description, "Applied migration");
        Ok(())
    }
}

/// Schema history of the user store, oldest first
pub fn user_migrations() -> Vec<Migration> {
    vec![Migration {
        version: 1,
        description: "Create users table",
        sql: format!(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id BIGSERIAL PRIMARY KEY,
                username TEXT NOT NULL,
                email TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                active BOOLEAN NOT NULL DEFAULT TRUE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                CONSTRAINT {} UNIQUE (username),
                CONSTRAINT {} UNIQUE (email)
            );
            "#,
            USERS_USERNAME_CONSTRAINT, USERS_EMAIL_CONSTRAINT
        ),
    }]
}

pub async fn run_user_migrations(pool: &PgPool) -> Result<(), DomainError> {
    let ran = PostgresMigrator::new(pool.clone())
        .run_pending(&user_migrations())
        .await?;

    info!(applied = ran, "User store schema up to date");
    Ok(())
}
