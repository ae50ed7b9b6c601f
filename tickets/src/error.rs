//! Error types for ticket redemption.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for ticket operations.
pub type Result<T> = std::result::Result<T, RedemptionError>;

/// Every way a redemption request can fail.
///
/// All errors are terminal for the request. No error path leaves a partial
/// mutation behind.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RedemptionError {
    // ═══════════════════════════════════════════════════════════
    // Ticket State
    // ═══════════════════════════════════════════════════════════
    /// Ticket status is not `active` (inactive or cancelled).
    #[error("Ticket is not active")]
    NotActive,

    /// Ticket was redeemed before.
    #[error("Ticket is already redeemed")]
    AlreadyRedeemed,

    // ═══════════════════════════════════════════════════════════
    // Authentication / Authorization
    // ═══════════════════════════════════════════════════════════
    /// The actor holds no role that allows redemption.
    #[error("You can't redeem this ticket")]
    NotAuthorized,

    /// The actor does not resolve to a user.
    #[error("Not authenticated")]
    Unauthenticated,

    // ═══════════════════════════════════════════════════════════
    // Lookup
    // ═══════════════════════════════════════════════════════════
    /// Ticket, template, or related row does not exist.
    #[error("Not found")]
    NotFound,

    // ═══════════════════════════════════════════════════════════
    // Workflow
    // ═══════════════════════════════════════════════════════════
    /// A redemption is already running on this store.
    #[error("A redemption is already in progress")]
    RedemptionInProgress,

    // ═══════════════════════════════════════════════════════════
    // Infrastructure
    // ═══════════════════════════════════════════════════════════
    /// Storage failure.
    #[error("Database error: {0}")]
    Database(String),

    /// Runtime failure (timeout, closed channel, poisoned lock).
    #[error("Internal error")]
    Internal,
}

impl RedemptionError {
    /// Returns `true` if the caller caused the error (as opposed to the system).
    ///
    /// # Examples
    ///
    /// ```
    /// # use community_tickets::RedemptionError;
    /// assert!(RedemptionError::NotAuthorized.is_user_error());
    /// assert!(!RedemptionError::Internal.is_user_error());
    /// ```
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        !matches!(self, Self::Database(_) | Self::Internal)
    }

    /// Short stable label, used for metrics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NotActive => "not_active",
            Self::AlreadyRedeemed => "already_redeemed",
            Self::NotAuthorized => "not_authorized",
            Self::Unauthenticated => "unauthenticated",
            Self::NotFound => "not_found",
            Self::RedemptionInProgress => "in_progress",
            Self::Database(_) => "database",
            Self::Internal => "internal",
        }
    }
}
