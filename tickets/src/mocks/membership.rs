//! Mock membership repository for testing.

use crate::error::{RedemptionError, Result};
use crate::providers::MembershipRepository;
use crate::types::{CommunityId, CommunityRole, EventId, EventRole, UserId};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

/// Mock membership repository.
///
/// One role per `(user, community)` and per `(user, event)`, like the
/// primary keys of the membership tables.
#[derive(Debug, Clone, Default)]
pub struct MockMembershipRepository {
    community_roles: Arc<Mutex<HashMap<(UserId, CommunityId), CommunityRole>>>,
    event_roles: Arc<Mutex<HashMap<(UserId, EventId), EventRole>>>,
}

impl MockMembershipRepository {
    /// Create a new mock membership repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the role of a user in a community.
    ///
    /// # Errors
    ///
    /// Returns `RedemptionError::Internal` if the lock is poisoned.
    pub fn set_community_role(
        &self,
        user_id: UserId,
        community_id: CommunityId,
        role: CommunityRole,
    ) -> Result<()> {
        self.community_roles
            .lock()
            .map_err(|_| RedemptionError::Internal)?
            .insert((user_id, community_id), role);
        Ok(())
    }

    /// Set the role of a user on an event.
    ///
    /// # Errors
    ///
    /// Returns `RedemptionError::Internal` if the lock is poisoned.
    pub fn set_event_role(&self, user_id: UserId, event_id: EventId, role: EventRole) -> Result<()> {
        self.event_roles
            .lock()
            .map_err(|_| RedemptionError::Internal)?
            .insert((user_id, event_id), role);
        Ok(())
    }
}

impl MembershipRepository for MockMembershipRepository {
    fn community_role(
        &self,
        user_id: UserId,
        community_id: CommunityId,
    ) -> impl Future<Output = Result<Option<CommunityRole>>> + Send {
        let community_roles = Arc::clone(&self.community_roles);

        async move {
            Ok(community_roles
                .lock()
                .map_err(|_| RedemptionError::Internal)?
                .get(&(user_id, community_id))
                .copied())
        }
    }

    fn event_role(
        &self,
        user_id: UserId,
        event_id: EventId,
    ) -> impl Future<Output = Result<Option<EventRole>>> + Send {
        let event_roles = Arc::clone(&self.event_roles);

        async move {
            Ok(event_roles
                .lock()
                .map_err(|_| RedemptionError::Internal)?
                .get(&(user_id, event_id))
                .copied())
        }
    }
}
