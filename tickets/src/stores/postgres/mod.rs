//! PostgreSQL storage implementations.
//!
//! This module provides persistent storage using PostgreSQL for:
//! - Users (super-admin flag)
//! - Community and event memberships
//! - Event ownership
//! - Ticket templates and user tickets (conditional redemption update)
//!
//! Enum columns are stored as TEXT and decoded with `FromStr`; a value that
//! does not parse surfaces as `RedemptionError::Database`.

pub mod event;
pub mod membership;
pub mod ticket;
pub mod user;

// Re-exports
pub use event::PostgresEventRepository;
pub use membership::PostgresMembershipRepository;
pub use ticket::PostgresTicketRepository;
pub use user::PostgresUserRepository;

use crate::config::PostgresConfig;
use crate::environment::RedemptionEnvironment;
use crate::error::{RedemptionError, Result};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

/// Redemption environment backed by PostgreSQL.
pub type PostgresEnvironment = RedemptionEnvironment<
    PostgresUserRepository,
    PostgresMembershipRepository,
    PostgresEventRepository,
    PostgresTicketRepository,
>;

/// Open a connection pool using `config`.
///
/// # Errors
///
/// Returns [`RedemptionError::Database`] if the database is unreachable.
pub async fn connect(config: &PostgresConfig) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout))
        .idle_timeout(Duration::from_secs(config.idle_timeout))
        .connect(&config.url)
        .await
        .map_err(|e| RedemptionError::Database(format!("Failed to connect: {e}")))
}

/// Run database migrations.
///
/// # Errors
///
/// Returns [`RedemptionError::Database`] if migrations fail.
pub async fn migrate(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| RedemptionError::Database(format!("Migration failed: {e}")))?;
    Ok(())
}

/// Build a redemption environment whose repositories share `pool`.
#[must_use]
pub fn environment(pool: &PgPool) -> PostgresEnvironment {
    RedemptionEnvironment::new(
        PostgresUserRepository::new(pool.clone()),
        PostgresMembershipRepository::new(pool.clone()),
        PostgresEventRepository::new(pool.clone()),
        PostgresTicketRepository::new(pool.clone()),
    )
}

pub(crate) fn db_error(context: &str) -> impl Fn(sqlx::Error) -> RedemptionError {
    move |e| RedemptionError::Database(format!("{context}: {e}"))
}

pub(crate) fn decode<T>(column: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| RedemptionError::Database(format!("Invalid {column} column: {e}")))
}
