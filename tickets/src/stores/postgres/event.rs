//! PostgreSQL event repository implementation.

use super::db_error;
use crate::error::Result;
use crate::providers::EventRepository;
use crate::types::{CommunityId, EventId};
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL event repository.
#[derive(Debug, Clone)]
pub struct PostgresEventRepository {
    /// PostgreSQL connection pool.
    pool: PgPool,
}

impl PostgresEventRepository {
    /// Create a new PostgreSQL event repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl EventRepository for PostgresEventRepository {
    async fn communities_for_event(&self, event_id: EventId) -> Result<Vec<CommunityId>> {
        let ids: Vec<Uuid> = sqlx::query_scalar(
            r"
            SELECT community_id
            FROM events_communities
            WHERE event_id = $1
            ORDER BY community_id
            ",
        )
        .bind(event_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to get event communities"))?;

        Ok(ids.into_iter().map(CommunityId).collect())
    }
}
