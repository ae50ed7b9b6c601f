//! Mock event repository for testing.

use crate::error::{RedemptionError, Result};
use crate::providers::EventRepository;
use crate::types::{CommunityId, EventId};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

/// Mock event repository.
///
/// Stores the `events_communities` join as a list of owners per event.
#[derive(Debug, Clone, Default)]
pub struct MockEventRepository {
    owners: Arc<Mutex<HashMap<EventId, Vec<CommunityId>>>>,
}

impl MockEventRepository {
    /// Create a new mock event repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `community_id` owns `event_id`. Linking twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `RedemptionError::Internal` if the lock is poisoned.
    pub fn link_community(&self, event_id: EventId, community_id: CommunityId) -> Result<()> {
        let mut owners = self.owners.lock().map_err(|_| RedemptionError::Internal)?;
        let communities = owners.entry(event_id).or_default();
        if !communities.contains(&community_id) {
            communities.push(community_id);
        }
        Ok(())
    }
}

impl EventRepository for MockEventRepository {
    fn communities_for_event(
        &self,
        event_id: EventId,
    ) -> impl Future<Output = Result<Vec<CommunityId>>> + Send {
        let owners = Arc::clone(&self.owners);

        async move {
            Ok(owners
                .lock()
                .map_err(|_| RedemptionError::Internal)?
                .get(&event_id)
                .cloned()
                .unwrap_or_default())
        }
    }
}
