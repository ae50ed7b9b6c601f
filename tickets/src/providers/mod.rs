//! Provider traits for ticket redemption.
//!
//! This module defines traits for every storage dependency of the redemption
//! workflow. Reducers depend on these traits only. The runtime wires in a
//! concrete implementation:
//!
//! - **Production**: PostgreSQL stores (`stores::postgres`, feature `postgres`)
//! - **Testing**: In-memory mocks (`mocks`, feature `test-utils`)
//!
//! All traits are `Send + Sync` and return `Send` futures so they can be
//! awaited inside `Effect::Future`.

pub mod event;
pub mod membership;
pub mod ticket;
pub mod user;

// Re-export provider traits
pub use event::EventRepository;
pub use membership::MembershipRepository;
pub use ticket::TicketRepository;
pub use user::UserRepository;
