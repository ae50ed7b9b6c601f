//! Mock user repository for testing.

use crate::error::{RedemptionError, Result};
use crate::providers::UserRepository;
use crate::types::{User, UserId};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

/// Mock user repository.
///
/// Uses in-memory storage for testing.
#[derive(Debug, Clone, Default)]
pub struct MockUserRepository {
    users: Arc<Mutex<HashMap<UserId, User>>>,
}

impl MockUserRepository {
    /// Create a new mock user repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a user.
    ///
    /// # Errors
    ///
    /// Returns `RedemptionError::Internal` if the lock is poisoned.
    pub fn insert(&self, user: User) -> Result<()> {
        self.users
            .lock()
            .map_err(|_| RedemptionError::Internal)?
            .insert(user.id, user);
        Ok(())
    }
}

impl UserRepository for MockUserRepository {
    fn get_user_by_id(&self, user_id: UserId) -> impl Future<Output = Result<User>> + Send {
        let users = Arc::clone(&self.users);

        async move {
            users
                .lock()
                .map_err(|_| RedemptionError::Internal)?
                .get(&user_id)
                .cloned()
                .ok_or(RedemptionError::NotFound)
        }
    }
}
