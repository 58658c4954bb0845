//! UserStore contract and its PostgreSQL implementation.

use crate::error::AppError;
use crate::model::User;
use async_trait::async_trait;
use sqlx::PgPool;

/// Persistence interface for user records. "Not found" is `Ok(None)` /
/// `Ok(false)`, never an error, so callers can tell absence from failure.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    /// Page of records ordered by ascending id.
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<User>, AppError>;
    async fn count(&self) -> Result<i64, AppError>;
    async fn insert(&self, name: &str, email: &str) -> Result<User, AppError>;
    async fn update(&self, id: i64, name: &str, email: &str) -> Result<Option<User>, AppError>;
    /// Returns false when no row had that id.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;
}

const USER_COLUMNS: &str = "id, name, email, created_at, updated_at";

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        tracing::debug!(id, "find user by id");
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        tracing::debug!(email, "find user by email");
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<User>, AppError> {
        tracing::debug!(limit, offset, "list users");
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users ORDER BY id ASC LIMIT $1 OFFSET $2",
            USER_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn insert(&self, name: &str, email: &str) -> Result<User, AppError> {
        tracing::debug!(name, email, "insert user");
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (name, email) VALUES ($1, $2) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(name)
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation)?;
        Ok(user)
    }

    async fn update(&self, id: i64, name: &str, email: &str) -> Result<Option<User>, AppError> {
        tracing::debug!(id, name, email, "update user");
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET name = $2, email = $3, updated_at = NOW() WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        ))
        .bind(id)
        .bind(name)
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_unique_violation)?;
        Ok(user)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        tracing::debug!(id, "delete user");
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// The unique index on email is the authority on duplicates; the service-level
/// check is only an early rejection. Surface a constraint violation as the
/// duplicate-email error rather than a generic database failure.
fn map_unique_violation(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(ref db) = e {
        if db.code().as_deref() == Some("23505") {
            return AppError::DuplicateEmail;
        }
    }
    AppError::Db(e)
}

/// Create the users table if absent. Idempotent; run at startup.
pub async fn ensure_users_table(pool: &PgPool) -> Result<(), AppError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}
