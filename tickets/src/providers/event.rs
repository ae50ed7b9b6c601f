//! Event repository trait.

use crate::error::Result;
use crate::types::{CommunityId, EventId};
use std::future::Future;

/// Event ownership lookups.
pub trait EventRepository: Send + Sync {
    /// Communities owning `event_id`. Empty for an event with no owner.
    ///
    /// # Errors
    ///
    /// Returns error if the database query fails.
    fn communities_for_event(
        &self,
        event_id: EventId,
    ) -> impl Future<Output = Result<Vec<CommunityId>>> + Send;
}
