//! # Community Testing
//!
//! Testing utilities and helpers for reducers built on `community-core`.
//!
//! This crate provides:
//! - Deterministic implementations of Environment traits
//! - Helpers that resolve effects into the actions they produce
//! - A Given-When-Then harness that steps a reducer workflow
//!
//! ## Example
//!
//! ```ignore
//! use community_testing::{helpers::resolve_effects, test_clock};
//!
//! #[tokio::test]
//! async fn loading_facts_produces_a_follow_up_action() {
//!     let env = test_environment(test_clock());
//!     let mut state = RedemptionState::default();
//!
//!     let effects = RedemptionReducer.reduce(&mut state, action, &env);
//!     let actions = resolve_effects(effects).await;
//!     assert_eq!(actions.len(), 1);
//! }
//! ```

use chrono::{DateTime, Utc};
use community_core::environment::Clock;


pub use reducer_test::ReducerTest;

/// Deterministic implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use community_testing::mocks::FixedClock;
    /// use community_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// Panics if the hardcoded timestamp fails to parse, which cannot happen.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Helpers for driving effects outside of a store
pub mod helpers {
    use community_core::effect::Effect;

    /// Execute effects the way the store would, without feeding actions back
    ///
    /// `Parallel` effects are flattened and every `Future` is awaited.
    /// Returns the actions produced, in effect order.
    pub async fn resolve_effects<A, I>(effects: I) -> Vec<A>
    where
        I: IntoIterator<Item = Effect<A>>,
    {
        let mut pending = Vec::new();
        let mut stack: Vec<Effect<A>> = effects.into_iter().collect();
        stack.reverse();

        while let Some(effect) = stack.pop() {
            match effect {
                Effect::None => {},
                Effect::Future(fut) => pending.push(fut),
                Effect::Parallel(children) => stack.extend(children.into_iter().rev()),
            }
        }

        futures::future::join_all(pending)
            .await
            .into_iter()
            .flatten()
            .collect()
    }

    /// Number of effects that do work
    ///
    /// `Effect::None` counts as zero and `Parallel` as the sum of its children.
    #[must_use]
    pub fn count_effects<A>(effects: &[Effect<A>]) -> usize {
        effects
            .iter()
            .map(|effect| match effect {
                Effect::None => 0,
                Effect::Future(_) => 1,
                Effect::Parallel(children) => count_effects(children),
            })
            .sum()
    }

    /// Install a `fmt` subscriber honouring `RUST_LOG` for test output
    ///
    /// Safe to call from every test; only the first call installs.
    pub fn init_test_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, test_clock};
