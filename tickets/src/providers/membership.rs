//! Membership repository trait.

use crate::error::Result;
use crate::types::{CommunityId, CommunityRole, EventId, EventRole, UserId};
use std::future::Future;

/// Community and event membership lookups.
///
/// A user holds at most one role per community and one role per event.
pub trait MembershipRepository: Send + Sync {
    /// Role of `user_id` in `community_id`, `None` if not a member.
    ///
    /// # Errors
    ///
    /// Returns error if the database query fails.
    fn community_role(
        &self,
        user_id: UserId,
        community_id: CommunityId,
    ) -> impl Future<Output = Result<Option<CommunityRole>>> + Send;

    /// Role of `user_id` on `event_id`, `None` if not a member.
    ///
    /// # Errors
    ///
    /// Returns error if the database query fails.
    fn event_role(
        &self,
        user_id: UserId,
        event_id: EventId,
    ) -> impl Future<Output = Result<Option<EventRole>>> + Send;
}
