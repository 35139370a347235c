//! Store module - The runtime for reducers
//!
//! The [`Store`] owns exactly one state value. The only way to change it is
//! [`Store::dispatch`], which runs the reducer synchronously, commits the
//! result, and then notifies every listener before returning.
//!
//! # Re-entrancy
//!
//! A listener may dispatch. Such a dispatch does not run immediately: it is
//! appended to a FIFO queue and returns `Ok(())`. The outermost dispatch
//! drains the queue once its own notification pass is over, giving each
//! queued action its own transition and notification pass. Failures of
//! queued actions are reported to the outermost caller in a
//! [`NotificationReport`].
//!
//! # Threads
//!
//! Every operation goes through one re-entrant lock. Another thread calling
//! into the store waits until the running dispatch (queue included) is done;
//! the dispatching thread itself may call back in from listeners. A listener
//! must therefore never block on another thread that uses the same store.

use crate::{
    StoreConfig,
    error::{ListenerFailure, NotificationReport, QueuedFailure, StoreError},
    metrics::{self as names, counter, gauge, histogram},
    subscription::{Detach, Listener, ListenerRegistry, Subscription, SubscriptionId},
};
use parking_lot::ReentrantMutex;
use std::any::Any;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Weak};
use std::time::Instant;
use unistate_core::{Action, ReduceError, Reducer};

/// Mutable part of the store. Borrows never outlive a single statement
/// group, and are never held while user code runs.
struct Inner<S, A> {
    state: Arc<S>,
    registry: ListenerRegistry,
    dispatching: bool,
    queue: VecDeque<A>,
    committed: u64,
}

struct Shared<S, A> {
    gate: ReentrantMutex<RefCell<Inner<S, A>>>,
}

impl<S, A> Detach for Shared<S, A>
where
    S: Send + Sync,
    A: Send,
{
    fn detach(&self, id: SubscriptionId) {
        let gate = self.gate.lock();
        let mut inner = gate.borrow_mut();
        if inner.registry.remove(id) {
            #[allow(clippy::cast_precision_loss)]
            gauge!(names::LISTENERS_ACTIVE).set(inner.registry.len() as f64);
            tracing::debug!(subscription = %id, "Listener unsubscribed");
        }
    }
}

/// Resets the dispatching flag when a pass ends, including by unwinding.
struct PassGuard<'a, S, A>(&'a RefCell<Inner<S, A>>);

impl<S, A> Drop for PassGuard<'_, S, A> {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.0.try_borrow_mut() {
            inner.dispatching = false;
            let dropped = inner.queue.len();
            if dropped > 0 {
                tracing::warn!(dropped, "Dispatch pass aborted; discarding queued actions");
                inner.queue.clear();
            }
        }
    }
}

fn next_queued<S, A>(cell: &RefCell<Inner<S, A>>) -> Option<A> {
    cell.borrow_mut().queue.pop_front()
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string())
}

/// The Store - single owner of a state value
///
/// The Store manages:
/// 1. State (an immutable `Arc<S>` snapshot, replaced on every commit)
/// 2. Reducer (the transition function)
/// 3. Listeners (notified after every committed transition)
///
/// # Type Parameters
///
/// - `R`: Reducer implementation; its `State` and `Action` are the store's
///
/// # Example
///
/// ```
/// use unistate_core::{from_fn, Action};
/// use unistate_runtime::Store;
///
/// struct Toggle;
///
/// impl Action for Toggle {
///     fn kind(&self) -> &'static str {
///         "TOGGLE"
///     }
/// }
///
/// let store = Store::new(from_fn(false, |on: &bool, _: &Toggle| Some(!on)));
/// store.dispatch(Toggle)?;
/// assert!(*store.state());
/// # Ok::<(), unistate_runtime::StoreError>(())
/// ```
pub struct Store<R>
where
    R: Reducer,
{
    reducer: R,
    config: StoreConfig,
    shared: Arc<Shared<R::State, R::Action>>,
}

impl<R> Store<R>
where
    R: Reducer,
    R::State: Send + Sync + 'static,
    R::Action: Action + Send + 'static,
{
    /// Create a store whose state starts at the reducer's initial state
    #[must_use]
    pub fn new(reducer: R) -> Self {
        Self::with_config(reducer, None, StoreConfig::default())
    }

    /// Create a store starting from an explicit state
    #[must_use]
    pub fn with_initial_state(reducer: R, initial_state: R::State) -> Self {
        Self::with_config(reducer, Some(initial_state), StoreConfig::default())
    }

    /// Create a store with custom configuration
    ///
    /// # Arguments
    ///
    /// - `reducer`: The transition function
    /// - `initial_state`: Starting state; `None` asks the reducer for its default
    /// - `config`: Queue bound and panic isolation settings
    #[must_use]
    pub fn with_config(reducer: R, initial_state: Option<R::State>, config: StoreConfig) -> Self {
        let state = initial_state.unwrap_or_else(|| reducer.initial_state());

        Self {
            reducer,
            config,
            shared: Arc::new(Shared {
                gate: ReentrantMutex::new(RefCell::new(Inner {
                    state: Arc::new(state),
                    registry: ListenerRegistry::default(),
                    dispatching: false,
                    queue: VecDeque::new(),
                    committed: 0,
                })),
            }),
        }
    }

    /// The configuration this store was built with
    #[must_use]
    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// The current state
    ///
    /// Cheap (one reference count increment). Inside a listener this is
    /// the state the triggering transition committed.
    #[must_use]
    pub fn state(&self) -> Arc<R::State> {
        let gate = self.shared.gate.lock();
        let state = Arc::clone(&gate.borrow().state);
        state
    }

    /// Read current state via a closure
    ///
    /// ```ignore
    /// let counter = store.read(|s| s.counter);
    /// ```
    pub fn read<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&R::State) -> T,
    {
        let state = self.state();
        f(&state)
    }

    /// Number of transitions committed since construction
    #[must_use]
    pub fn dispatch_count(&self) -> u64 {
        let gate = self.shared.gate.lock();
        let committed = gate.borrow().committed;
        committed
    }

    /// Number of registered listeners
    #[must_use]
    pub fn listener_count(&self) -> usize {
        let gate = self.shared.gate.lock();
        let count = gate.borrow().registry.len();
        count
    }

    /// Whether a dispatch is running on this thread right now
    ///
    /// Only ever `true` when called from a listener.
    #[must_use]
    pub fn is_dispatching(&self) -> bool {
        let gate = self.shared.gate.lock();
        let dispatching = gate.borrow().dispatching;
        dispatching
    }

    /// Register a listener
    ///
    /// The listener runs after every committed transition, in subscription
    /// order, until the returned handle is unsubscribed. A listener added
    /// during a notification pass first runs on the next pass.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.subscribe_shared(Arc::new(listener))
    }

    /// Register an already shared listener
    ///
    /// Registering the same `Arc` twice creates two independent
    /// registrations, each called once per pass and each removable on its
    /// own.
    pub fn subscribe_shared(&self, listener: Listener) -> Subscription {
        let (id, active) = {
            let gate = self.shared.gate.lock();
            let mut inner = gate.borrow_mut();
            let registered = inner.registry.register(listener);
            #[allow(clippy::cast_precision_loss)]
            gauge!(names::LISTENERS_ACTIVE).set(inner.registry.len() as f64);
            registered
        };
        tracing::debug!(subscription = %id, "Listener subscribed");

        let owner = Arc::downgrade(&self.shared);
        let owner: Weak<dyn Detach> = owner;
        Subscription::new(id, active, owner)
    }

    /// Dispatch an action
    ///
    /// 1. Calls the reducer with the current state and `action`
    /// 2. Commits the returned state
    /// 3. Calls every listener registered at this point, in order
    /// 4. Drains actions that listeners dispatched meanwhile
    ///
    /// When called from a listener, the action is queued instead and this
    /// returns `Ok(())` at once (see the module docs).
    ///
    /// # Errors
    ///
    /// - [`StoreError::Transition`] if the reducer rejects `action`. Nothing
    ///   was committed and no listener ran.
    /// - [`StoreError::QueueFull`] if called from a listener while the
    ///   queue is at [`StoreConfig::max_queued_actions`].
    /// - [`StoreError::Notification`] if `action` was committed but a
    ///   listener panicked or a queued action was rejected.
    ///
    /// # Panics
    ///
    /// Only when panic isolation is turned off in [`StoreConfig`]; the
    /// panic of the reducer or listener then propagates. A reducer panic
    /// still leaves the state unchanged. Actions queued by listeners during
    /// the aborted dispatch are discarded, even though their nested
    /// `dispatch` calls already returned `Ok(())`.
    #[tracing::instrument(skip_all, name = "store_dispatch", fields(action = action.kind()))]
    pub fn dispatch(&self, action: R::Action) -> Result<(), StoreError> {
        let gate = self.shared.gate.lock();
        let cell: &RefCell<Inner<R::State, R::Action>> = &gate;

        {
            let mut inner = cell.borrow_mut();
            if inner.dispatching {
                return self.enqueue(&mut inner, action);
            }
            inner.dispatching = true;
        }
        let _pass = PassGuard(cell);

        tracing::debug!("Processing action");
        self.apply(cell, &action)
            .map_err(|source| StoreError::Transition {
                action: action.kind(),
                source,
            })?;

        let mut report = NotificationReport::default();
        self.notify(cell, &mut report);

        while let Some(queued) = next_queued(cell) {
            let span = tracing::debug_span!("queued_action", action = queued.kind());
            let _enter = span.enter();
            match self.apply(cell, &queued) {
                Ok(()) => self.notify(cell, &mut report),
                Err(source) => report.queued_failures.push(QueuedFailure {
                    action: queued.kind(),
                    source,
                }),
            }
        }

        tracing::debug!("Action processing completed");
        report.into_result()
    }

    fn enqueue(
        &self,
        inner: &mut Inner<R::State, R::Action>,
        action: R::Action,
    ) -> Result<(), StoreError> {
        let capacity = self.config.max_queued_actions;
        if inner.queue.len() >= capacity {
            tracing::warn!(capacity, "Rejected action: dispatch queue is full");
            return Err(StoreError::QueueFull { capacity });
        }

        inner.queue.push_back(action);
        counter!(names::DISPATCH_QUEUED).increment(1);
        tracing::debug!(
            pending = inner.queue.len(),
            "Dispatch during notification; queued until the current pass completes"
        );
        Ok(())
    }

    /// Run the reducer and commit its result. No borrow is held while the
    /// reducer runs.
    fn apply(
        &self,
        cell: &RefCell<Inner<R::State, R::Action>>,
        action: &R::Action,
    ) -> Result<(), ReduceError> {
        let current = Arc::clone(&cell.borrow().state);

        let outcome = {
            let span = tracing::debug_span!("reducer_execution");
            let _enter = span.enter();

            let start = Instant::now();
            let outcome = self.run_reducer(&current, action);
            histogram!(names::REDUCER_DURATION).record(start.elapsed().as_secs_f64());
            outcome
        };

        match outcome {
            Ok(next) => {
                let mut inner = cell.borrow_mut();
                inner.state = Arc::new(next);
                inner.committed += 1;
                counter!(names::DISPATCH_TOTAL).increment(1);
                tracing::trace!(committed = inner.committed, "Transition committed");
                Ok(())
            },
            Err(error) => {
                counter!(names::DISPATCH_REJECTED).increment(1);
                tracing::warn!(
                    action = action.kind(),
                    %error,
                    "Transition rejected; state unchanged"
                );
                Err(error)
            },
        }
    }

    fn run_reducer(&self, state: &R::State, action: &R::Action) -> Result<R::State, ReduceError> {
        if !self.config.catch_reducer_panics {
            return self.reducer.reduce(state, action);
        }

        panic::catch_unwind(AssertUnwindSafe(|| self.reducer.reduce(state, action)))
            .unwrap_or_else(|payload| {
                Err(ReduceError::Panicked {
                    message: panic_message(&*payload),
                })
            })
    }

    /// One notification pass over the registry as it was when the pass
    /// started. Registrations removed mid-pass are skipped.
    fn notify(&self, cell: &RefCell<Inner<R::State, R::Action>>, report: &mut NotificationReport) {
        let registrations = cell.borrow().registry.snapshot();
        tracing::trace!("Notifying {} listeners", registrations.len());

        for registration in registrations {
            if !registration.is_active() {
                tracing::trace!(subscription = %registration.id, "Skipping removed listener");
                continue;
            }

            tracing::trace!(subscription = %registration.id, "Notifying listener");
            if !self.config.catch_listener_panics {
                registration.notify();
                continue;
            }

            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| registration.notify())) {
                let message = panic_message(&*payload);
                counter!(names::LISTENER_FAILURES).increment(1);
                tracing::warn!(
                    subscription = %registration.id,
                    %message,
                    "Listener panicked; continuing notification"
                );
                report.listener_failures.push(ListenerFailure {
                    subscription: registration.id,
                    message,
                });
            }
        }
    }
}

impl<R> fmt::Debug for Store<R>
where
    R: Reducer,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let gate = self.shared.gate.lock();
        let result = match gate.try_borrow() {
            Ok(inner) => f
                .debug_struct("Store")
                .field("config", &self.config)
                .field("listeners", &inner.registry.len())
                .field("committed", &inner.committed)
                .field("dispatching", &inner.dispatching)
                .finish(),
            Err(_) => f.debug_struct("Store").finish_non_exhaustive(),
        };
        result
    }
}
