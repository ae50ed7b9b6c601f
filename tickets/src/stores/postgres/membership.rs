//! PostgreSQL membership repository implementation.
//!
//! Reads `users_communities` and `events_users`.

use super::{db_error, decode};
use crate::error::Result;
use crate::providers::MembershipRepository;
use crate::types::{CommunityId, CommunityRole, EventId, EventRole, UserId};
use sqlx::PgPool;

/// PostgreSQL membership repository.
#[derive(Debug, Clone)]
pub struct PostgresMembershipRepository {
    /// PostgreSQL connection pool.
    pool: PgPool,
}

impl PostgresMembershipRepository {
    /// Create a new PostgreSQL membership repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl MembershipRepository for PostgresMembershipRepository {
    async fn community_role(
        &self,
        user_id: UserId,
        community_id: CommunityId,
    ) -> Result<Option<CommunityRole>> {
        let role: Option<String> = sqlx::query_scalar(
            r"
            SELECT role
            FROM users_communities
            WHERE user_id = $1 AND community_id = $2
            ",
        )
        .bind(user_id.0)
        .bind(community_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to get community role"))?;

        role.as_deref().map(|r| decode("users_communities.role", r)).transpose()
    }

    async fn event_role(&self, user_id: UserId, event_id: EventId) -> Result<Option<EventRole>> {
        let role: Option<String> = sqlx::query_scalar(
            r"
            SELECT role
            FROM events_users
            WHERE user_id = $1 AND event_id = $2
            ",
        )
        .bind(user_id.0)
        .bind(event_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to get event role"))?;

        role.as_deref().map(|r| decode("events_users.role", r)).transpose()
    }
}
