//! Listener registrations and the handles that revoke them.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

/// A change listener: a callback with no arguments and no return value
///
/// Listeners read the new state through the store itself (`Store::state`).
pub type Listener = Arc<dyn Fn() + Send + Sync>;

/// Identifier of one registration
///
/// Ids are unique per store and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// The raw numeric id
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Removal hook implemented by the store's shared state.
pub(crate) trait Detach: Send + Sync {
    fn detach(&self, id: SubscriptionId);
}

/// One entry of the registry.
///
/// Clones share the `active` flag, so a snapshot taken at the start of a
/// notification pass observes removals made during that pass.
#[derive(Clone)]
pub(crate) struct Registration {
    pub(crate) id: SubscriptionId,
    listener: Listener,
    active: Arc<AtomicBool>,
}

impl Registration {
    pub(crate) fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub(crate) fn notify(&self) {
        (self.listener)();
    }
}

/// Ordered collection of registrations.
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    entries: Vec<Registration>,
    next_id: u64,
}

impl ListenerRegistry {
    pub(crate) fn register(&mut self, listener: Listener) -> (SubscriptionId, Arc<AtomicBool>) {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        let active = Arc::new(AtomicBool::new(true));
        self.entries.push(Registration {
            id,
            listener,
            active: Arc::clone(&active),
        });
        (id, active)
    }

    /// Remove a registration, returning whether it was present.
    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        match self.entries.iter().position(|entry| entry.id == id) {
            Some(index) => {
                let entry = self.entries.remove(index);
                entry.active.store(false, Ordering::Release);
                true
            },
            None => false,
        }
    }

    /// Registrations in subscription order, as of now.
    pub(crate) fn snapshot(&self) -> Vec<Registration> {
        self.entries.clone()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Handle returned by `Store::subscribe`
///
/// [`Subscription::unsubscribe`] removes exactly the registration that
/// created this handle. Calling it again, or after the store is gone, does
/// nothing.
///
/// Dropping the handle does **not** unsubscribe; the listener stays
/// registered for the lifetime of the store.
#[must_use = "dropping a Subscription leaves the listener registered; keep it to unsubscribe later"]
pub struct Subscription {
    id: SubscriptionId,
    active: Arc<AtomicBool>,
    owner: Weak<dyn Detach>,
}

impl Subscription {
    pub(crate) fn new(id: SubscriptionId, active: Arc<AtomicBool>, owner: Weak<dyn Detach>) -> Self {
        Self { id, active, owner }
    }

    /// The id of the registration this handle controls
    #[must_use]
    pub const fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Whether the listener is still registered with a live store
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire) && self.owner.strong_count() > 0
    }

    /// Remove the registration
    ///
    /// Safe to call from inside a listener: a listener removed during a
    /// notification pass is not called again in that pass.
    pub fn unsubscribe(&self) {
        if !self.active.swap(false, Ordering::AcqRel) {
            tracing::trace!(subscription = %self.id, "Already unsubscribed");
            return;
        }
        if let Some(owner) = self.owner.upgrade() {
            owner.detach(self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
