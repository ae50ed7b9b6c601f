//! Redemption authorization policy.
//!
//! Pure functions over explicit facts. No I/O, no ambient context: every
//! input the decision depends on is passed in, so the rules can be tested
//! exhaustively.
//!
//! # Rules
//!
//! First match wins:
//!
//! 1. Global super-admin → [`Grant::SuperAdmin`]
//! 2. `admin` on the event → [`Grant::EventAdmin`]
//! 3. `admin` or `volunteer` on any community owning the event → [`Grant::CommunityStaff`]
//! 4. `collaborator` on the event → [`Grant::EventCollaborator`]
//! 5. Otherwise denied
//!
//! Ticket ownership plays no part. Holding your own ticket does not let you
//! redeem it.

use crate::error::{RedemptionError, Result};
use crate::types::{
    CommunityRole, EventId, EventRole, RedemptionStatus, TicketStatus, User, UserId, UserTicket,
};
use serde::{Deserialize, Serialize};

/// The user attempting a redemption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// User ID of the actor.
    pub user_id: UserId,
    /// Global administrator flag.
    pub is_super_admin: bool,
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            is_super_admin: user.is_super_admin,
        }
    }
}

/// The rule that allowed a redemption. Logged for audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grant {
    /// Global super-admin.
    SuperAdmin,
    /// Admin of the event.
    EventAdmin,
    /// Admin or volunteer of a community owning the event.
    CommunityStaff,
    /// Collaborator on the event.
    EventCollaborator,
}

impl Grant {
    /// Stable label for logs and metrics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::EventAdmin => "event_admin",
            Self::CommunityStaff => "community_staff",
            Self::EventCollaborator => "event_collaborator",
        }
    }
}

/// Why a redemption was refused by the role check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Denial {
    /// No rule matched.
    NoQualifyingRole,
}

impl Denial {
    /// Message shown to the caller.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::NoQualifyingRole => "You can't redeem this ticket",
        }
    }
}

impl From<Denial> for RedemptionError {
    fn from(denial: Denial) -> Self {
        match denial {
            Denial::NoQualifyingRole => Self::NotAuthorized,
        }
    }
}

/// Outcome of the role check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    /// Redemption allowed by the given rule.
    Allowed(Grant),
    /// Redemption refused.
    Denied(Denial),
}

/// Everything the decision needs, gathered before it runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedemptionFacts {
    /// The ticket being redeemed.
    pub ticket: UserTicket,
    /// The user attempting the redemption.
    pub actor: Actor,
    /// Event the ticket admits to.
    pub event_id: EventId,
    /// Actor's role on the event, if any.
    pub event_role: Option<EventRole>,
    /// Actor's roles on the communities owning the event (one entry per
    /// community where the actor is a member of any kind).
    pub community_roles: Vec<CommunityRole>,
}

/// Decide whether `actor` may redeem tickets of an event.
#[must_use]
pub fn can_redeem(
    actor: &Actor,
    event_role: Option<EventRole>,
    community_roles: &[CommunityRole],
) -> Decision {
    if actor.is_super_admin {
        return Decision::Allowed(Grant::SuperAdmin);
    }
    if event_role == Some(EventRole::Admin) {
        return Decision::Allowed(Grant::EventAdmin);
    }
    if community_roles.iter().any(CommunityRole::is_staff) {
        return Decision::Allowed(Grant::CommunityStaff);
    }
    if event_role == Some(EventRole::Collaborator) {
        return Decision::Allowed(Grant::EventCollaborator);
    }
    Decision::Denied(Denial::NoQualifyingRole)
}

/// Fail with [`RedemptionError::NotActive`] unless the ticket is active.
///
/// # Errors
///
/// Returns [`RedemptionError::NotActive`] for inactive and cancelled tickets.
pub fn ensure_active(status: TicketStatus) -> Result<()> {
    if status == TicketStatus::Active {
        Ok(())
    } else {
        Err(RedemptionError::NotActive)
    }
}

/// Fail with [`RedemptionError::AlreadyRedeemed`] unless the ticket is unused.
///
/// # Errors
///
/// Returns [`RedemptionError::AlreadyRedeemed`] if the ticket was redeemed.
pub fn ensure_pending(status: RedemptionStatus) -> Result<()> {
    match status {
        RedemptionStatus::Pending => Ok(()),
        RedemptionStatus::Redeemed => Err(RedemptionError::AlreadyRedeemed),
    }
}

/// Run the full check in order: active → role → not yet redeemed.
///
/// The state guard runs before the role check, so an unauthorized actor on a
/// cancelled ticket still sees "Ticket is not active".
///
/// # Errors
///
/// Returns the first failing check's error.
pub fn evaluate(facts: &RedemptionFacts) -> Result<Grant> {
    ensure_active(facts.ticket.status)?;

    let grant = match can_redeem(&facts.actor, facts.event_role, &facts.community_roles) {
        Decision::Allowed(grant) => grant,
        Decision::Denied(denial) => return Err(denial.into()),
    };

    ensure_pending(facts.ticket.redemption_status)?;
    Ok(grant)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::types::{TicketTemplateId, UserTicket};
    use chrono::Utc;
    use proptest::prelude::*;

    fn actor(is_super_admin: bool) -> Actor {
        Actor {
            user_id: UserId::new(),
            is_super_admin,
        }
    }

    fn facts(
        status: TicketStatus,
        actor: Actor,
        event_role: Option<EventRole>,
        community_roles: Vec<CommunityRole>,
    ) -> RedemptionFacts {
        RedemptionFacts {
            ticket: UserTicket::issue(UserId::new(), TicketTemplateId::new(), Utc::now())
                .with_status(status),
            actor,
            event_id: EventId::new(),
            event_role,
            community_roles,
        }
    }

    fn arb_event_role() -> impl Strategy<Value = Option<EventRole>> {
        prop::option::of(prop::sample::select(EventRole::ALL))
    }

    fn arb_community_roles() -> impl Strategy<Value = Vec<CommunityRole>> {
        prop::collection::vec(prop::sample::select(CommunityRole::ALL), 0..4)
    }

    fn arb_status() -> impl Strategy<Value = TicketStatus> {
        prop::sample::select(TicketStatus::ALL)
    }

    #[test]
    fn rules_are_checked_in_order() {
        // Super-admin beats every membership
        assert_eq!(
            can_redeem(&actor(true), Some(EventRole::Admin), &[CommunityRole::Admin]),
            Decision::Allowed(Grant::SuperAdmin)
        );
        // Event admin beats community staff
        assert_eq!(
            can_redeem(&actor(false), Some(EventRole::Admin), &[CommunityRole::Volunteer]),
            Decision::Allowed(Grant::EventAdmin)
        );
        // Community staff beats event collaborator
        assert_eq!(
            can_redeem(
                &actor(false),
                Some(EventRole::Collaborator),
                &[CommunityRole::Admin]
            ),
            Decision::Allowed(Grant::CommunityStaff)
        );
        assert_eq!(
            can_redeem(&actor(false), Some(EventRole::Collaborator), &[]),
            Decision::Allowed(Grant::EventCollaborator)
        );
    }

    #[test]
    fn staff_of_any_owning_community_is_enough() {
        let decision = can_redeem(
            &actor(false),
            None,
            &[CommunityRole::Member, CommunityRole::Collaborator, CommunityRole::Volunteer],
        );
        assert_eq!(decision, Decision::Allowed(Grant::CommunityStaff));
    }

    #[test]
    fn community_collaborator_is_not_staff() {
        let decision = can_redeem(&actor(false), None, &[CommunityRole::Collaborator]);
        assert_eq!(decision, Decision::Denied(Denial::NoQualifyingRole));
        assert_eq!(Denial::NoQualifyingRole.reason(), "You can't redeem this ticket");
    }

    #[test]
    fn inactive_ticket_fails_before_authorization() {
        let result = evaluate(&facts(TicketStatus::Cancelled, actor(false), None, vec![]));
        assert_eq!(result, Err(RedemptionError::NotActive));
    }

    #[test]
    fn redeemed_ticket_fails_after_authorization() {
        let mut authorized = facts(TicketStatus::Active, actor(false), Some(EventRole::Admin), vec![]);
        authorized.ticket.redemption_status = RedemptionStatus::Redeemed;
        assert_eq!(evaluate(&authorized), Err(RedemptionError::AlreadyRedeemed));

        // An outsider learns nothing about redemption state
        let mut outsider = facts(TicketStatus::Active, actor(false), None, vec![]);
        outsider.ticket.redemption_status = RedemptionStatus::Redeemed;
        assert_eq!(evaluate(&outsider), Err(RedemptionError::NotAuthorized));
    }

    proptest! {
        #[test]
        fn super_admin_always_allowed_on_active_ticket(
            event_role in arb_event_role(),
            community_roles in arb_community_roles(),
        ) {
            let result = evaluate(&facts(TicketStatus::Active, actor(true), event_role, community_roles));
            prop_assert_eq!(result, Ok(Grant::SuperAdmin));
        }

        #[test]
        fn event_admin_or_collaborator_allowed(
            event_role in prop::sample::select(vec![EventRole::Admin, EventRole::Collaborator]),
            community_roles in arb_community_roles(),
        ) {
            let result = evaluate(&facts(TicketStatus::Active, actor(false), Some(event_role), community_roles));
            prop_assert!(result.is_ok());
        }

        #[test]
        fn community_staff_allowed_with_any_event_role(
            staff in prop::sample::select(vec![CommunityRole::Admin, CommunityRole::Volunteer]),
            event_role in arb_event_role(),
            mut others in arb_community_roles(),
        ) {
            others.push(staff);
            let result = evaluate(&facts(TicketStatus::Active, actor(false), event_role, others));
            prop_assert!(result.is_ok());
        }

        #[test]
        fn plain_members_are_denied(
            event_member in any::<bool>(),
            community_members in 0_usize..3,
        ) {
            let event_role = event_member.then_some(EventRole::Member);
            let community_roles = vec![CommunityRole::Member; community_members];
            let result = evaluate(&facts(TicketStatus::Active, actor(false), event_role, community_roles));
            prop_assert_eq!(result, Err(RedemptionError::NotAuthorized));
        }

        #[test]
        fn non_active_ticket_is_never_redeemable(
            status in arb_status().prop_filter("not active", |s| *s != TicketStatus::Active),
            is_super_admin in any::<bool>(),
            event_role in arb_event_role(),
            community_roles in arb_community_roles(),
        ) {
            let result = evaluate(&facts(status, actor(is_super_admin), event_role, community_roles));
            prop_assert_eq!(result, Err(RedemptionError::NotActive));
        }

        #[test]
        fn decision_ignores_ticket_ownership(
            event_role in arb_event_role(),
            community_roles in arb_community_roles(),
        ) {
            let stranger = actor(false);
            let mut owned = facts(TicketStatus::Active, stranger, event_role, community_roles);
            let as_stranger = evaluate(&owned);
            owned.ticket.user_id = stranger.user_id;
            prop_assert_eq!(evaluate(&owned), as_stranger);
        }
    }
}
