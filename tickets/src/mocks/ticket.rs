//! Mock ticket repository for testing.

use crate::error::{RedemptionError, Result};
use crate::providers::TicketRepository;
use crate::types::{RedemptionStatus, TicketTemplate, TicketTemplateId, UserTicket, UserTicketId};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

/// Mock ticket repository.
///
/// `redeem_pending_ticket` checks and writes under one lock, giving the same
/// compare-and-set guarantee as the conditional `UPDATE` in PostgreSQL.
#[derive(Debug, Clone, Default)]
pub struct MockTicketRepository {
    tickets: Arc<Mutex<HashMap<UserTicketId, UserTicket>>>,
    templates: Arc<Mutex<HashMap<TicketTemplateId, TicketTemplate>>>,
}

impl MockTicketRepository {
    /// Create a new mock ticket repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a user ticket.
    ///
    /// # Errors
    ///
    /// Returns `RedemptionError::Internal` if the lock is poisoned.
    pub fn insert_ticket(&self, ticket: UserTicket) -> Result<()> {
        self.tickets
            .lock()
            .map_err(|_| RedemptionError::Internal)?
            .insert(ticket.id, ticket);
        Ok(())
    }

    /// Insert or replace a ticket template.
    ///
    /// # Errors
    ///
    /// Returns `RedemptionError::Internal` if the lock is poisoned.
    pub fn insert_template(&self, template: TicketTemplate) -> Result<()> {
        self.templates
            .lock()
            .map_err(|_| RedemptionError::Internal)?
            .insert(template.id, template);
        Ok(())
    }
}

impl TicketRepository for MockTicketRepository {
    fn get_user_ticket(
        &self,
        ticket_id: UserTicketId,
    ) -> impl Future<Output = Result<UserTicket>> + Send {
        let tickets = Arc::clone(&self.tickets);

        async move {
            tickets
                .lock()
                .map_err(|_| RedemptionError::Internal)?
                .get(&ticket_id)
                .cloned()
                .ok_or(RedemptionError::NotFound)
        }
    }

    fn get_ticket_template(
        &self,
        template_id: TicketTemplateId,
    ) -> impl Future<Output = Result<TicketTemplate>> + Send {
        let templates = Arc::clone(&self.templates);

        async move {
            templates
                .lock()
                .map_err(|_| RedemptionError::Internal)?
                .get(&template_id)
                .cloned()
                .ok_or(RedemptionError::NotFound)
        }
    }

    fn redeem_pending_ticket(
        &self,
        ticket_id: UserTicketId,
        now: DateTime<Utc>,
    ) -> impl Future<Output = Result<Option<UserTicket>>> + Send {
        let tickets = Arc::clone(&self.tickets);

        async move {
            let mut guard = tickets.lock().map_err(|_| RedemptionError::Internal)?;

            match guard.get_mut(&ticket_id) {
                Some(ticket) if ticket.is_redeemable() => {
                    ticket.redemption_status = RedemptionStatus::Redeemed;
                    ticket.updated_at = now;
                    Ok(Some(ticket.clone()))
                },
                _ => Ok(None),
            }
        }
    }
}
