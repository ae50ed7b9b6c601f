//! Redemption environment.
//!
//! This module defines the environment type for dependency injection
//! in the redemption reducer.

use crate::providers::{EventRepository, MembershipRepository, TicketRepository, UserRepository};
use community_core::environment::{Clock, SystemClock};
use std::sync::Arc;

/// Redemption environment.
///
/// Contains all external dependencies needed by the redemption reducer.
///
/// # Type Parameters
///
/// - `U`: User repository
/// - `M`: Membership repository
/// - `E`: Event repository
/// - `T`: Ticket repository
#[derive(Clone)]
pub struct RedemptionEnvironment<U, M, E, T>
where
    U: UserRepository + Clone,
    M: MembershipRepository + Clone,
    E: EventRepository + Clone,
    T: TicketRepository + Clone,
{
    /// User repository.
    pub users: U,

    /// Community and event memberships.
    pub memberships: M,

    /// Event ownership.
    pub events: E,

    /// Tickets and templates.
    pub tickets: T,

    /// Clock for `updated_at`.
    pub clock: Arc<dyn Clock>,
}

impl<U, M, E, T> RedemptionEnvironment<U, M, E, T>
where
    U: UserRepository + Clone,
    M: MembershipRepository + Clone,
    E: EventRepository + Clone,
    T: TicketRepository + Clone,
{
    /// Create a new redemption environment using the system clock.
    #[must_use]
    pub fn new(users: U, memberships: M, events: E, tickets: T) -> Self {
        Self {
            users,
            memberships,
            events,
            tickets,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }
}
