//! Mock provider implementations for testing.
//!
//! This module provides simple, in-memory implementations of all provider
//! traits for use in unit and integration tests, plus a [`Fixture`] that
//! seeds a community, an event it owns, and a ticket template.

pub mod event;
pub mod fixture;
pub mod membership;
pub mod ticket;
pub mod user;

pub use event::MockEventRepository;
pub use fixture::Fixture;
pub use membership::MockMembershipRepository;
pub use ticket::MockTicketRepository;
pub use user::MockUserRepository;

use crate::environment::RedemptionEnvironment;

/// Redemption environment backed entirely by in-memory mocks.
pub type MockEnvironment = RedemptionEnvironment<
    MockUserRepository,
    MockMembershipRepository,
    MockEventRepository,
    MockTicketRepository,
>;
