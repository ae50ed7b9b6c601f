//! Ticket repository trait.

use crate::error::Result;
use crate::types::{TicketTemplate, TicketTemplateId, UserTicket, UserTicketId};
use chrono::{DateTime, Utc};
use std::future::Future;

/// Ticket and ticket template storage.
pub trait TicketRepository: Send + Sync {
    /// Get a user ticket by ID.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Database query fails
    /// - Ticket not found → `RedemptionError::NotFound`
    fn get_user_ticket(
        &self,
        ticket_id: UserTicketId,
    ) -> impl Future<Output = Result<UserTicket>> + Send;

    /// Get a ticket template by ID.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Database query fails
    /// - Template not found → `RedemptionError::NotFound`
    fn get_ticket_template(
        &self,
        template_id: TicketTemplateId,
    ) -> impl Future<Output = Result<TicketTemplate>> + Send;

    /// Mark a ticket redeemed if, and only if, it is active and pending.
    ///
    /// Atomic compare-and-set: the check and the write happen as one
    /// operation, so of several concurrent calls for the same ticket at most
    /// one returns `Some`. Sets `updated_at` to `now`.
    ///
    /// # Returns
    ///
    /// The updated ticket, or `None` if no redeemable ticket matched.
    ///
    /// # Errors
    ///
    /// Returns error if the database query fails.
    fn redeem_pending_ticket(
        &self,
        ticket_id: UserTicketId,
        now: DateTime<Utc>,
    ) -> impl Future<Output = Result<Option<UserTicket>>> + Send;
}
