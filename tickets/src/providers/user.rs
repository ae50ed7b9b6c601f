//! User repository trait.

use crate::error::Result;
use crate::types::{User, UserId};
use std::future::Future;

/// User repository.
pub trait UserRepository: Send + Sync {
    /// Get user by ID.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Database query fails
    /// - User not found → `RedemptionError::NotFound`
    fn get_user_by_id(&self, user_id: UserId) -> impl Future<Output = Result<User>> + Send;
}
