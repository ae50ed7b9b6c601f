//! State of a single redemption request.

use crate::error::RedemptionError;
use crate::policy::Grant;
use crate::types::{UserId, UserTicket, UserTicketId};
use serde::{Deserialize, Serialize};

/// Where the workflow is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RedemptionPhase {
    /// Waiting for `RedeemTicket`.
    #[default]
    Idle,
    /// Facts are being read from storage.
    LoadingFacts,
    /// Policy allowed the redemption; conditional update in flight.
    Committing,
    /// Ticket redeemed.
    Redeemed,
    /// Redemption failed.
    Rejected,
}

impl RedemptionPhase {
    /// `true` once the workflow has finished.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Redeemed | Self::Rejected)
    }
}

/// Redemption state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedemptionState {
    /// Current phase.
    pub phase: RedemptionPhase,
    /// Ticket being redeemed.
    pub ticket_id: Option<UserTicketId>,
    /// User performing the redemption.
    pub actor_id: Option<UserId>,
    /// Rule that allowed the redemption.
    pub grant: Option<Grant>,
    /// Updated ticket, once redeemed.
    pub ticket: Option<UserTicket>,
    /// Failure, once rejected.
    pub error: Option<RedemptionError>,
}
