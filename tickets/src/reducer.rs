//! Redemption reducer.
//!
//! Drives one redemption request through
//! `Idle → LoadingFacts → Committing → Redeemed`, or to `Rejected` from any
//! non-idle phase.
//!
//! # Flow
//!
//! 1. `RedeemTicket`: record who redeems what, load facts from storage
//! 2. `FactsLoaded`: run [`policy::evaluate`]; on success issue the
//!    conditional update, otherwise reject
//! 3. `TicketRedeemed` / `RedemptionRejected`: record the outcome
//!
//! All decisions are made here. Effects only read facts and perform the
//! single conditional write.

use crate::actions::RedemptionAction;
use crate::environment::RedemptionEnvironment;
use crate::error::{RedemptionError, Result};
use crate::policy::{self, Actor, RedemptionFacts};
use crate::providers::{EventRepository, MembershipRepository, TicketRepository, UserRepository};
use crate::state::{RedemptionPhase, RedemptionState};
use crate::types::{UserId, UserTicket, UserTicketId};
use chrono::{DateTime, Utc};
use community_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};

/// Redemption reducer.
///
/// # Type Parameters
///
/// - `U`: User repository
/// - `M`: Membership repository
/// - `E`: Event repository
/// - `T`: Ticket repository
#[derive(Clone)]
pub struct RedemptionReducer<U, M, E, T> {
    /// Phantom data to hold type parameters.
    _phantom: std::marker::PhantomData<(U, M, E, T)>,
}

impl<U, M, E, T> RedemptionReducer<U, M, E, T> {
    /// Create a new redemption reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<U, M, E, T> Default for RedemptionReducer<U, M, E, T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Read everything the policy needs, in a fixed order.
///
/// A missing ticket is `NotFound`; an actor id that resolves to no user is
/// `Unauthenticated`.
async fn load_facts<U, M, E, T>(
    env: &RedemptionEnvironment<U, M, E, T>,
    ticket_id: UserTicketId,
    actor_id: UserId,
) -> Result<RedemptionFacts>
where
    U: UserRepository + Clone,
    M: MembershipRepository + Clone,
    E: EventRepository + Clone,
    T: TicketRepository + Clone,
{
    let ticket = env.tickets.get_user_ticket(ticket_id).await?;

    let user = env
        .users
        .get_user_by_id(actor_id)
        .await
        .map_err(|e| match e {
            RedemptionError::NotFound => RedemptionError::Unauthenticated,
            other => other,
        })?;
    let actor = Actor::from(&user);

    let template = env.tickets.get_ticket_template(ticket.ticket_template_id).await?;
    let event_id = template.event_id;

    let communities = env.events.communities_for_event(event_id).await?;
    let event_role = env.memberships.event_role(actor.user_id, event_id).await?;

    let mut community_roles = Vec::with_capacity(communities.len());
    for community_id in communities {
        if let Some(role) = env
            .memberships
            .community_role(actor.user_id, community_id)
            .await?
        {
            community_roles.push(role);
        }
    }

    tracing::debug!(
        %ticket_id,
        %actor_id,
        %event_id,
        is_super_admin = actor.is_super_admin,
        ?event_role,
        ?community_roles,
        "Loaded redemption facts"
    );

    Ok(RedemptionFacts {
        ticket,
        actor,
        event_id,
        event_role,
        community_roles,
    })
}

/// Perform the conditional update and classify a miss.
///
/// A miss means another request changed the ticket after the facts were
/// read: re-read it to tell a deactivation from a concurrent redemption.
async fn commit_redemption<T>(
    tickets: &T,
    ticket_id: UserTicketId,
    now: DateTime<Utc>,
) -> Result<UserTicket>
where
    T: TicketRepository,
{
    if let Some(ticket) = tickets.redeem_pending_ticket(ticket_id, now).await? {
        return Ok(ticket);
    }

    let current = tickets.get_user_ticket(ticket_id).await?;
    policy::ensure_active(current.status)?;
    Err(RedemptionError::AlreadyRedeemed)
}

fn outcome(result: Result<UserTicket>) -> RedemptionAction {
    match result {
        Ok(ticket) => RedemptionAction::TicketRedeemed { ticket },
        Err(error) => RedemptionAction::RedemptionRejected { error },
    }
}

impl<U, M, E, T> Reducer for RedemptionReducer<U, M, E, T>
where
    U: UserRepository + Clone + 'static,
    M: MembershipRepository + Clone + 'static,
    E: EventRepository + Clone + 'static,
    T: TicketRepository + Clone + 'static,
{
    type State = RedemptionState;
    type Action = RedemptionAction;
    type Environment = RedemptionEnvironment<U, M, E, T>;

    #[allow(clippy::too_many_lines)] // One arm per action
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ═══════════════════════════════════════════════════════════════
            // RedeemTicket: start the workflow
            // ═══════════════════════════════════════════════════════════════
            RedemptionAction::RedeemTicket {
                ticket_id,
                actor_id,
            } => {
                if state.phase != RedemptionPhase::Idle {
                    tracing::warn!(
                        %ticket_id,
                        phase = ?state.phase,
                        "RedeemTicket while a redemption is in progress"
                    );
                    return smallvec![Effect::emit(RedemptionAction::RedemptionRejected {
                        error: RedemptionError::RedemptionInProgress,
                    })];
                }

                tracing::info!(%ticket_id, %actor_id, "Redeeming ticket");

                state.phase = RedemptionPhase::LoadingFacts;
                state.ticket_id = Some(ticket_id);
                state.actor_id = Some(actor_id);

                let env = env.clone();
                smallvec![Effect::future(async move {
                    Some(match load_facts(&env, ticket_id, actor_id).await {
                        Ok(facts) => RedemptionAction::FactsLoaded { facts },
                        Err(error) => RedemptionAction::RedemptionRejected { error },
                    })
                })]
            },

            // ═══════════════════════════════════════════════════════════════
            // FactsLoaded: decide
            // ═══════════════════════════════════════════════════════════════
            RedemptionAction::FactsLoaded { facts } => {
                if state.phase != RedemptionPhase::LoadingFacts
                    || state.ticket_id != Some(facts.ticket.id)
                {
                    tracing::warn!(phase = ?state.phase, "FactsLoaded out of phase, ignoring");
                    return smallvec![Effect::None];
                }

                match policy::evaluate(&facts) {
                    Ok(grant) => {
                        tracing::info!(
                            ticket_id = %facts.ticket.id,
                            actor_id = %facts.actor.user_id,
                            grant = grant.as_str(),
                            "Redemption authorized"
                        );

                        state.phase = RedemptionPhase::Committing;
                        state.grant = Some(grant);

                        let tickets = env.tickets.clone();
                        let ticket_id = facts.ticket.id;
                        let now = env.clock.now();
                        smallvec![Effect::future(async move {
                            Some(outcome(commit_redemption(&tickets, ticket_id, now).await))
                        })]
                    },
                    Err(error) => {
                        smallvec![Effect::emit(RedemptionAction::RedemptionRejected { error })]
                    },
                }
            },

            // ═══════════════════════════════════════════════════════════════
            // TicketRedeemed: success
            // ═══════════════════════════════════════════════════════════════
            RedemptionAction::TicketRedeemed { ticket } => {
                if state.phase != RedemptionPhase::Committing {
                    tracing::warn!(phase = ?state.phase, "TicketRedeemed out of phase, ignoring");
                    return smallvec![Effect::None];
                }

                tracing::info!(ticket_id = %ticket.id, "Ticket redeemed");

                state.phase = RedemptionPhase::Redeemed;
                state.ticket = Some(ticket);
                smallvec![Effect::None]
            },

            // ═══════════════════════════════════════════════════════════════
            // RedemptionRejected: failure
            // ═══════════════════════════════════════════════════════════════
            RedemptionAction::RedemptionRejected { error } => {
                // Addressed to the duplicate caller, not to this workflow
                if error == RedemptionError::RedemptionInProgress {
                    return smallvec![Effect::None];
                }

                if !matches!(
                    state.phase,
                    RedemptionPhase::LoadingFacts | RedemptionPhase::Committing
                ) {
                    tracing::warn!(phase = ?state.phase, "RedemptionRejected out of phase, ignoring");
                    return smallvec![Effect::None];
                }

                if error.is_user_error() {
                    tracing::warn!(ticket_id = ?state.ticket_id, %error, "Redemption rejected");
                } else {
                    tracing::error!(ticket_id = ?state.ticket_id, %error, "Redemption failed");
                }

                state.phase = RedemptionPhase::Rejected;
                state.error = Some(error);
                smallvec![Effect::None]
            },
        }
    }
}
