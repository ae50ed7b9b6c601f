//! # Community Tickets
//!
//! Ticket redemption for the community platform: deciding who may mark a
//! ticket as used at the door, and doing so exactly once.
//!
//! ## Authorization
//!
//! Redemption is role-based across two nested entities. An actor may redeem
//! any active ticket of an event when they are:
//!
//! - a global super-admin,
//! - an `admin` or `collaborator` of the event, or
//! - an `admin` or `volunteer` of a community owning the event.
//!
//! Inactive and cancelled tickets are refused before roles are considered.
//!
//! ## Architecture
//!
//! The decision is a pure function ([`policy::evaluate`]) over facts. The
//! workflow around it is a reducer:
//!
//! ```text
//! RedeemTicket → load facts → FactsLoaded → evaluate → conditional update → TicketRedeemed
//!                                                   ↘ RedemptionRejected
//! ```
//!
//! [`TicketRedemptionService`] runs one store per request and waits for the
//! terminal action.
//!
//! ## Example
//!
//! ```rust,ignore
//! use community_tickets::{mocks::Fixture, TicketRedemptionService};
//!
//! let fixture = Fixture::new();
//! let (actor, ticket) = fixture.actor_and_active_ticket();
//! fixture.add_event_role(actor.id, EventRole::Admin);
//!
//! let service = TicketRedemptionService::new(fixture.environment());
//! let redeemed = service.redeem_user_ticket(ticket.id, actor.id).await?;
//! assert_eq!(redeemed.redemption_status, RedemptionStatus::Redeemed);
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

// Public modules
pub mod actions;
pub mod config;
pub mod environment;
pub mod error;
pub mod policy;
pub mod providers;
pub mod reducer;
pub mod service;
pub mod state;
pub mod stores;
pub mod types;

#[cfg(feature = "test-utils")]
pub mod mocks;

// Re-export main types for convenience
pub use actions::RedemptionAction;
pub use config::Config;
pub use environment::RedemptionEnvironment;
pub use error::{RedemptionError, Result};
pub use policy::{Actor, Decision, Denial, Grant, RedemptionFacts, can_redeem, evaluate};
pub use reducer::RedemptionReducer;
pub use service::TicketRedemptionService;
pub use state::{RedemptionPhase, RedemptionState};
pub use types::{
    ApprovalStatus, CommunityId, CommunityRole, EventId, EventRole, PaymentStatus,
    RedemptionStatus, TicketStatus, TicketTemplate, TicketTemplateId, User, UserId, UserTicket,
    UserTicketId,
};
