//! # Community Core
//!
//! Building blocks for workflows on the community platform.
//!
//! A workflow is a [`reducer::Reducer`]: given its state, one action and an
//! environment of injected services, it updates the state in place and
//! returns [`effect::Effect`] values. Effects describe I/O; the runtime crate
//! performs them and feeds the action each one yields back into the reducer.
//! Reducers never touch storage or the wall clock directly, so a test can
//! drive them step by step with fakes.
//!
//! ```ignore
//! use community_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};
//!
//! impl Reducer for DoorReducer {
//!     type State = DoorState;
//!     type Action = DoorAction;
//!     type Environment = DoorEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut DoorState,
//!         action: DoorAction,
//!         env: &DoorEnvironment,
//!     ) -> SmallVec<[Effect<DoorAction>; 4]> {
//!         state.scans += 1;
//!         let badges = env.badges.clone();
//!         smallvec![Effect::future(async move { badges.check().await })]
//!     }
//! }
//! ```

#![forbid(unsafe_code)]

pub use smallvec::{SmallVec, smallvec};

/// The reducer abstraction
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// Decision logic of a workflow
    pub trait Reducer {
        /// What the workflow remembers between actions
        type State;

        /// Commands sent in and events fed back by effects
        type Action;

        /// Services the effects run against
        type Environment;

        /// Apply `action` to `state` and describe the follow-up work
        ///
        /// Must not block or perform I/O. An action seldom needs more than
        /// one effect, so four fit inline.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Descriptions of work for the runtime
pub mod effect {
    use std::fmt;
    use std::future::Future;
    use std::pin::Pin;

    /// Work a reducer asks the runtime to do
    pub enum Effect<Action> {
        /// Nothing to do
        None,

        /// Children started together, with no ordering between them
        Parallel(Vec<Effect<Action>>),

        /// Async work; a `Some` result is sent back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    impl<Action: fmt::Debug> fmt::Debug for Effect<Action> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Self::None => f.write_str("Effect::None"),
                Self::Parallel(children) => f.debug_tuple("Effect::Parallel").field(children).finish(),
                Self::Future(_) => f.write_str("Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Run `effects` side by side
        #[must_use]
        pub const fn merge(effects: Vec<Self>) -> Self {
            Self::Parallel(effects)
        }

        /// Box `fut` as a [`Effect::Future`]
        #[must_use]
        pub fn future<F>(fut: F) -> Self
        where
            F: Future<Output = Option<Action>> + Send + 'static,
        {
            Self::Future(Box::pin(fut))
        }

        /// Yield `action` right away
        ///
        /// Lets a reducer publish a decision, such as a rejection, to
        /// observers of the store the same way effect results are.
        #[must_use]
        pub fn emit(action: Action) -> Self
        where
            Action: Send + 'static,
        {
            Self::future(async move { Some(action) })
        }
    }
}

/// Services every environment may need
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Source of the current time
    pub trait Clock: Send + Sync {
        /// Current instant in UTC
        fn now(&self) -> DateTime<Utc>;
    }

    /// [`Clock`] reading the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
