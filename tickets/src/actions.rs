//! Actions for the redemption workflow.

use crate::error::RedemptionError;
use crate::policy::RedemptionFacts;
use crate::types::{UserId, UserTicket, UserTicketId};
use serde::{Deserialize, Serialize};

/// Redemption actions.
///
/// One command starts the workflow; the rest are events produced by effects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RedemptionAction {
    // ═══════════════════════════════════════════════════════════════════════
    // Commands
    // ═══════════════════════════════════════════════════════════════════════
    /// Redeem `ticket_id` on behalf of `actor_id`.
    RedeemTicket {
        /// Ticket to redeem.
        ticket_id: UserTicketId,
        /// User performing the redemption (door staff, organizer).
        actor_id: UserId,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // Events
    // ═══════════════════════════════════════════════════════════════════════
    /// Ticket, actor, and membership facts were loaded.
    FactsLoaded {
        /// Inputs for the policy.
        facts: RedemptionFacts,
    },

    /// The ticket was marked redeemed. Terminal.
    TicketRedeemed {
        /// Ticket after the update.
        ticket: UserTicket,
    },

    /// The redemption failed. Terminal.
    RedemptionRejected {
        /// Why.
        error: RedemptionError,
    },
}

impl RedemptionAction {
    /// `true` for `TicketRedeemed` and `RedemptionRejected`.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::TicketRedeemed { .. } | Self::RedemptionRejected { .. }
        )
    }
}
