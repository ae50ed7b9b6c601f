//! # Community Runtime
//!
//! Executes reducers from `community-core`.
//!
//! A [`Store`] owns one workflow's state. Sending an action runs the reducer,
//! then every returned effect runs on its own task; the action an effect
//! yields is published to observers and sent back into the same store. A
//! request handler sends the first command and waits for the action that
//! ends the workflow:
//!
//! ```ignore
//! use community_runtime::Store;
//!
//! let store = Store::new(RedemptionState::default(), reducer, environment);
//!
//! let terminal = store
//!     .send_and_wait_for(command, RedemptionAction::is_terminal, timeout)
//!     .await?;
//! let phase = store.state(|s| s.phase).await;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use community_core::{effect::Effect, reducer::Reducer};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::{RwLock, broadcast};

/// How many produced actions an observer may fall behind before lagging.
const OBSERVER_BUFFER: usize = 16;

/// Failures of [`Store`] operations
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store was shut down and accepts no more actions
    #[error("Store is shutting down")]
    ShutdownInProgress,

    /// No matching action arrived within the deadline
    #[error("Timeout waiting for action")]
    Timeout,

    /// Every sender of produced actions is gone
    #[error("Action broadcast channel closed")]
    ChannelClosed,
}

struct Shared<S, E, R, A> {
    state: RwLock<S>,
    reducer: R,
    environment: E,
    closed: AtomicBool,
    produced: broadcast::Sender<A>,
}

/// Runtime for one reducer workflow
///
/// Cloning yields another handle to the same store. Spawned effects hold a
/// handle so they can feed their action back.
pub struct Store<S, A, E, R> {
    shared: Arc<Shared<S, E, R, A>>,
}

impl<S, A, E, R> Clone for Store<S, A, E, R> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
    A: Send + Clone + 'static,
    S: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    /// Build a store around `initial_state`
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        let (produced, _) = broadcast::channel(OBSERVER_BUFFER);
        Self {
            shared: Arc::new(Shared {
                state: RwLock::new(initial_state),
                reducer,
                environment,
                closed: AtomicBool::new(false),
                produced,
            }),
        }
    }

    /// Reduce `action` and start its effects
    ///
    /// Returns once the reducer has run. Effects keep running on spawned
    /// tasks.
    ///
    /// # Errors
    ///
    /// [`StoreError::ShutdownInProgress`] after [`Store::shutdown`].
    #[tracing::instrument(skip(self, action), name = "store_send")]
    pub async fn send(&self, action: A) -> Result<(), StoreError> {
        let effects = {
            let mut state = self.shared.state.write().await;

            // Checked under the lock: once `shutdown` returns and a state
            // read completes, no later action can reach the reducer
            if self.shared.closed.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shutting down");
                metrics::counter!("store.shutdown.rejected_actions").increment(1);
                return Err(StoreError::ShutdownInProgress);
            }
            metrics::counter!("store.commands.total").increment(1);

            let started = Instant::now();
            let effects = self
                .shared
                .reducer
                .reduce(&mut *state, action, &self.shared.environment);
            metrics::histogram!("store.reducer.duration_seconds")
                .record(started.elapsed().as_secs_f64());

            tracing::trace!(effects = effects.len(), "Reduced action");
            effects
        };

        for effect in effects {
            self.spawn_effect(effect);
        }
        Ok(())
    }

    /// Send `action`, then wait for the first produced action matching `predicate`
    ///
    /// Only actions yielded by effects are observed, never `action` itself.
    ///
    /// # Errors
    ///
    /// - [`StoreError::ShutdownInProgress`]: the store no longer accepts actions
    /// - [`StoreError::Timeout`]: nothing matched within `timeout`
    /// - [`StoreError::ChannelClosed`]: the producer side went away
    pub async fn send_and_wait_for<F>(
        &self,
        action: A,
        predicate: F,
        timeout: Duration,
    ) -> Result<A, StoreError>
    where
        F: Fn(&A) -> bool,
    {
        // Subscribed first so a fast effect cannot slip past
        let mut observer = self.subscribe_actions();
        self.send(action).await?;

        let wait = async {
            loop {
                match observer.recv().await {
                    Ok(produced) if predicate(&produced) => break Ok(produced),
                    Ok(_) => {},
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Action observer lagged");
                    },
                    Err(broadcast::error::RecvError::Closed) => {
                        break Err(StoreError::ChannelClosed);
                    },
                }
            }
        };

        tokio::time::timeout(timeout, wait)
            .await
            .unwrap_or(Err(StoreError::Timeout))
    }

    /// Observe every action produced by this store's effects
    #[must_use]
    pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
        self.shared.produced.subscribe()
    }

    /// Project the current state through `f`
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        f(&*self.shared.state.read().await)
    }

    /// Stop accepting actions
    ///
    /// Running effects finish, and what they yield is still published to
    /// observers, but [`Store::send`] rejects it. A reducer call already
    /// holding the state lock completes first; a state read after `shutdown`
    /// sees the last accepted transition.
    pub fn shutdown(&self) {
        self.shared.closed.store(true, Ordering::Release);
    }

    fn spawn_effect(&self, effect: Effect<A>) {
        match effect {
            Effect::None => {
                metrics::counter!("store.effects.executed", "type" => "none").increment(1);
            },
            Effect::Parallel(children) => {
                metrics::counter!("store.effects.executed", "type" => "parallel").increment(1);
                for child in children {
                    self.spawn_effect(child);
                }
            },
            Effect::Future(fut) => {
                metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                let store = self.clone();
                tokio::spawn(async move {
                    let Some(action) = fut.await else {
                        return;
                    };

                    // Nobody observing is fine
                    let _ = store.shared.produced.send(action.clone());
                    if let Err(error) = store.send(action).await {
                        tracing::debug!(%error, "Dropped action produced by effect");
                    }
                });
            },
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use community_core::{SmallVec, smallvec};

    #[derive(Debug, Default)]
    struct Turnstile {
        passed: u32,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Gate {
        Push,
        Scan,
        ScanGroup,
        Passed(u32),
    }

    struct TurnstileReducer;

    impl Reducer for TurnstileReducer {
        type State = Turnstile;
        type Action = Gate;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Turnstile,
            action: Gate,
            _env: &(),
        ) -> SmallVec<[Effect<Gate>; 4]> {
            match action {
                Gate::Push => {
                    state.passed += 1;
                    smallvec![Effect::emit(Gate::Passed(state.passed))]
                },
                Gate::Scan => smallvec![Effect::future(async { Some(Gate::Push) })],
                Gate::ScanGroup => smallvec![Effect::merge(vec![
                    Effect::emit(Gate::Push),
                    Effect::emit(Gate::Push),
                    Effect::emit(Gate::Push),
                ])],
                Gate::Passed(_) => smallvec![Effect::None],
            }
        }
    }

    fn store() -> Store<Turnstile, Gate, (), TurnstileReducer> {
        Store::new(Turnstile::default(), TurnstileReducer, ())
    }

    #[tokio::test]
    async fn reducer_runs_before_send_returns() {
        let store = store();
        store.send(Gate::Push).await.unwrap();
        assert_eq!(store.state(|s| s.passed).await, 1);
    }

    #[tokio::test]
    async fn produced_actions_are_fed_back() {
        let passed = store()
            .send_and_wait_for(
                Gate::Scan,
                |a| matches!(a, Gate::Passed(_)),
                Duration::from_secs(1),
            )
            .await
            .unwrap();

        assert_eq!(passed, Gate::Passed(1));
    }

    #[tokio::test]
    async fn parallel_children_all_run() {
        let store = store();
        let mut observer = store.subscribe_actions();
        store.send(Gate::ScanGroup).await.unwrap();

        let mut passed = 0;
        while passed < 3 {
            if let Gate::Passed(_) = observer.recv().await.unwrap() {
                passed += 1;
            }
        }
        assert_eq!(store.state(|s| s.passed).await, 3);
    }

    #[tokio::test]
    async fn waiting_for_an_action_that_never_comes_times_out() {
        let result = store()
            .send_and_wait_for(
                Gate::Passed(0),
                |a| matches!(a, Gate::Passed(_)),
                Duration::from_millis(20),
            )
            .await;

        assert_eq!(result, Err(StoreError::Timeout));
    }

    #[tokio::test]
    async fn actions_produced_after_shutdown_are_published_but_not_reduced() {
        let store = store();
        let mut observer = store.subscribe_actions();

        store.send(Gate::Scan).await.unwrap();
        store.shutdown();

        assert_eq!(observer.recv().await.unwrap(), Gate::Push);
        tokio::task::yield_now().await;
        assert_eq!(store.state(|s| s.passed).await, 0);
    }

    #[tokio::test]
    async fn shutdown_rejects_new_actions() {
        let store = store();
        store.shutdown();
        assert_eq!(
            store.send(Gate::Push).await,
            Err(StoreError::ShutdownInProgress)
        );
    }
}
