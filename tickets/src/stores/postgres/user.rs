//! PostgreSQL user repository implementation.

use super::db_error;
use crate::error::{RedemptionError, Result};
use crate::providers::UserRepository;
use crate::types::{User, UserId};
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL user repository.
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    /// PostgreSQL connection pool.
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a new PostgreSQL user repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    is_super_admin: bool,
}

impl UserRepository for PostgresUserRepository {
    async fn get_user_by_id(&self, user_id: UserId) -> Result<User> {
        let row: UserRow = sqlx::query_as(
            r"
            SELECT id, username, is_super_admin
            FROM users
            WHERE id = $1
            ",
        )
        .bind(user_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to get user"))?
        .ok_or(RedemptionError::NotFound)?;

        Ok(User {
            id: UserId(row.id),
            username: row.username,
            is_super_admin: row.is_super_admin,
        })
    }
}
