//! PostgreSQL ticket repository implementation.
//!
//! `tickets` holds templates; `user_tickets` holds issued tickets.

use super::{db_error, decode};
use crate::error::{RedemptionError, Result};
use crate::providers::TicketRepository;
use crate::types::{
    EventId, TicketTemplate, TicketTemplateId, UserId, UserTicket, UserTicketId,
};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL ticket repository.
#[derive(Debug, Clone)]
pub struct PostgresTicketRepository {
    /// PostgreSQL connection pool.
    pool: PgPool,
}

impl PostgresTicketRepository {
    /// Create a new PostgreSQL ticket repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserTicketRow {
    id: Uuid,
    user_id: Uuid,
    ticket_template_id: Uuid,
    status: String,
    redemption_status: String,
    approval_status: String,
    payment_status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserTicketRow> for UserTicket {
    type Error = RedemptionError;

    fn try_from(row: UserTicketRow) -> Result<Self> {
        Ok(Self {
            id: UserTicketId(row.id),
            user_id: UserId(row.user_id),
            ticket_template_id: TicketTemplateId(row.ticket_template_id),
            status: decode("user_tickets.status", &row.status)?,
            redemption_status: decode("user_tickets.redemption_status", &row.redemption_status)?,
            approval_status: decode("user_tickets.approval_status", &row.approval_status)?,
            payment_status: decode("user_tickets.payment_status", &row.payment_status)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct TemplateRow {
    id: Uuid,
    event_id: Uuid,
    name: String,
}

impl TicketRepository for PostgresTicketRepository {
    async fn get_user_ticket(&self, ticket_id: UserTicketId) -> Result<UserTicket> {
        let row: UserTicketRow = sqlx::query_as(
            r"
            SELECT id, user_id, ticket_template_id, status, redemption_status,
                   approval_status, payment_status, created_at, updated_at
            FROM user_tickets
            WHERE id = $1
            ",
        )
        .bind(ticket_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to get user ticket"))?
        .ok_or(RedemptionError::NotFound)?;

        row.try_into()
    }

    async fn get_ticket_template(&self, template_id: TicketTemplateId) -> Result<TicketTemplate> {
        let row: TemplateRow = sqlx::query_as(
            r"
            SELECT id, event_id, name
            FROM tickets
            WHERE id = $1
            ",
        )
        .bind(template_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to get ticket template"))?
        .ok_or(RedemptionError::NotFound)?;

        Ok(TicketTemplate {
            id: TicketTemplateId(row.id),
            event_id: EventId(row.event_id),
            name: row.name,
        })
    }

    async fn redeem_pending_ticket(
        &self,
        ticket_id: UserTicketId,
        now: DateTime<Utc>,
    ) -> Result<Option<UserTicket>> {
        // Single statement: the row lock taken by UPDATE serializes
        // concurrent redemptions, and the losers no longer match the WHERE.
        let row: Option<UserTicketRow> = sqlx::query_as(
            r"
            UPDATE user_tickets
            SET redemption_status = 'redeemed', updated_at = $2
            WHERE id = $1 AND status = 'active' AND redemption_status = 'pending'
            RETURNING id, user_id, ticket_template_id, status, redemption_status,
                      approval_status, payment_status, created_at, updated_at
            ",
        )
        .bind(ticket_id.0)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to redeem user ticket"))?;

        row.map(UserTicket::try_from).transpose()
    }
}
