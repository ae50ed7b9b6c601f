//! Request-level entry point for ticket redemption.
//!
//! Each call runs the redemption workflow on its own [`Store`], so requests
//! share no in-memory state. Concurrency between requests is resolved by the
//! ticket repository's conditional update.

use crate::actions::RedemptionAction;
use crate::environment::RedemptionEnvironment;
use crate::error::{RedemptionError, Result};
use crate::providers::{EventRepository, MembershipRepository, TicketRepository, UserRepository};
use crate::reducer::RedemptionReducer;
use crate::state::{RedemptionPhase, RedemptionState};
use crate::types::{UserId, UserTicket, UserTicketId};
use community_runtime::{Store, StoreError};
use std::time::Duration;
use tokio::sync::broadcast;

/// Default time a request waits for its workflow.
pub const DEFAULT_REDEMPTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Redeems tickets on behalf of an acting user.
#[derive(Clone)]
pub struct TicketRedemptionService<U, M, E, T>
where
    U: UserRepository + Clone,
    M: MembershipRepository + Clone,
    E: EventRepository + Clone,
    T: TicketRepository + Clone,
{
    environment: RedemptionEnvironment<U, M, E, T>,
    timeout: Duration,
}

impl<U, M, E, T> TicketRedemptionService<U, M, E, T>
where
    U: UserRepository + Clone + 'static,
    M: MembershipRepository + Clone + 'static,
    E: EventRepository + Clone + 'static,
    T: TicketRepository + Clone + 'static,
{
    /// Create a service with the default timeout.
    #[must_use]
    pub const fn new(environment: RedemptionEnvironment<U, M, E, T>) -> Self {
        Self {
            environment,
            timeout: DEFAULT_REDEMPTION_TIMEOUT,
        }
    }

    /// Set how long a request waits for its workflow.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Redeem `ticket_id` on behalf of `actor_id`.
    ///
    /// Returns the ticket with `redemption_status = redeemed`.
    ///
    /// # Errors
    ///
    /// - [`RedemptionError::NotActive`]: ticket status is not `active`
    /// - [`RedemptionError::NotAuthorized`]: actor holds no qualifying role
    /// - [`RedemptionError::AlreadyRedeemed`]: ticket was redeemed before (or concurrently)
    /// - [`RedemptionError::NotFound`]: ticket or its template does not exist
    /// - [`RedemptionError::Unauthenticated`]: actor does not resolve to a user
    /// - [`RedemptionError::Database`]: storage failure
    /// - [`RedemptionError::Internal`]: the workflow did not reach the
    ///   conditional update in time; the ticket is left untouched
    #[tracing::instrument(skip(self), name = "redeem_user_ticket")]
    pub async fn redeem_user_ticket(
        &self,
        ticket_id: UserTicketId,
        actor_id: UserId,
    ) -> Result<UserTicket> {
        let store = Store::new(
            RedemptionState::default(),
            RedemptionReducer::<U, M, E, T>::new(),
            self.environment.clone(),
        );
        let mut outcomes = store.subscribe_actions();

        let terminal = match store
            .send_and_wait_for(
                RedemptionAction::RedeemTicket {
                    ticket_id,
                    actor_id,
                },
                RedemptionAction::is_terminal,
                self.timeout,
            )
            .await
        {
            Ok(action) => Ok(action),
            Err(StoreError::Timeout) => Self::settle_after_timeout(&store, &mut outcomes).await,
            Err(error) => {
                tracing::error!(%error, "Redemption workflow did not complete");
                Err(RedemptionError::Internal)
            },
        };

        let result = match terminal {
            Ok(RedemptionAction::TicketRedeemed { ticket }) => Ok(ticket),
            Ok(RedemptionAction::RedemptionRejected { error }) | Err(error) => Err(error),
            Ok(other) => {
                tracing::error!(action = ?other, "Unexpected terminal action");
                Err(RedemptionError::Internal)
            },
        };

        let outcome = match &result {
            Ok(_) => "redeemed",
            Err(error) => error.kind(),
        };
        metrics::counter!("tickets.redemption.total", "outcome" => outcome).increment(1);

        result
    }

    /// Stop a timed-out workflow and report what it actually did.
    ///
    /// After shutdown no further action is reduced. If the reducer had not
    /// reached `Committing`, nothing was written and the request fails as
    /// `Internal`. Otherwise the conditional update is already running and
    /// its outcome, broadcast even after shutdown, is the answer.
    async fn settle_after_timeout(
        store: &RedemptionStore<U, M, E, T>,
        outcomes: &mut broadcast::Receiver<RedemptionAction>,
    ) -> Result<RedemptionAction> {
        store.shutdown();

        let phase = store.state(|s| s.phase).await;
        if matches!(phase, RedemptionPhase::Idle | RedemptionPhase::LoadingFacts) {
            tracing::error!(?phase, "Redemption timed out before committing");
            return Err(RedemptionError::Internal);
        }

        tracing::warn!(?phase, "Redemption timed out while committing, awaiting outcome");
        loop {
            match outcomes.recv().await {
                Ok(action) if action.is_terminal() => return Ok(action),
                Ok(_) => {},
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Redemption observer lagged");
                },
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::error!("Redemption outcome channel closed");
                    return Err(RedemptionError::Internal);
                },
            }
        }
    }
}

/// Store running one redemption workflow.
type RedemptionStore<U, M, E, T> = Store<
    RedemptionState,
    RedemptionAction,
    RedemptionEnvironment<U, M, E, T>,
    RedemptionReducer<U, M, E, T>,
>;
