use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A zero-argument change callback registered against a [`Store`](crate::Store).
///
/// A `Listener` is a shared handle: clones refer to the same callback and
/// count as the same listener for subscription purposes.
///
/// # Examples
///
/// ```
/// use syncstore::{Listener, Store};
///
/// let store = Store::new(0);
/// let listener = Listener::new(|| println!("changed"));
///
/// store.subscribe(listener.clone());
/// store.subscribe(listener); // already registered, no effect
/// assert_eq!(store.listener_count(), 1);
/// ```
#[derive(Clone)]
pub struct Listener {
    callback: Arc<dyn Fn() + Send + Sync>,
}

impl Listener {
    /// Wrap a callback into a new listener with its own identity.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            callback: Arc::new(callback),
        }
    }

    /// Invoke the callback.
    pub fn call(&self) {
        (self.callback)()
    }

    /// Whether both handles refer to the same registered callback.
    pub fn same(&self, other: &Listener) -> bool {
        self.addr() == other.addr()
    }

    fn addr(&self) -> *const () {
        Arc::as_ptr(&self.callback) as *const ()
    }
}

impl<F> From<F> for Listener
where
    F: Fn() + Send + Sync + 'static,
{
    fn from(callback: F) -> Self {
        Listener::new(callback)
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Listener").field(&self.addr()).finish()
    }
}

/// Insertion-ordered set of listeners, keyed by callback identity.
#[derive(Default)]
pub(crate) struct ListenerSet {
    entries: Vec<Listener>,
}

impl ListenerSet {
    /// Returns `false` if the listener was already present.
    pub(crate) fn insert(&mut self, listener: Listener) -> bool {
        if self.contains(&listener) {
            return false;
        }
        self.entries.push(listener);
        true
    }

    /// Returns `false` if the listener was not present.
    pub(crate) fn remove(&mut self, listener: &Listener) -> bool {
        match self.entries.iter().position(|l| l.same(listener)) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    pub(crate) fn contains(&self, listener: &Listener) -> bool {
        self.entries.iter().any(|l| l.same(listener))
    }

    /// Point-in-time copy used for fan-out.
    pub(crate) fn snapshot(&self) -> Vec<Listener> {
        self.entries.clone()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Capability that removes one listener from the store it was obtained from.
///
/// Calling [`unsubscribe`](Self::unsubscribe) more than once is harmless.
/// Dropping an `Unsubscribe` without calling it leaves the listener
/// registered; use [`into_guard`](Self::into_guard) for drop-based cleanup.
pub struct Unsubscribe {
    remove: Box<dyn Fn() + Send + Sync>,
    done: AtomicBool,
}

impl Unsubscribe {
    /// Build an unsubscribe capability from an arbitrary removal function.
    ///
    /// The function runs at most once, however many times the capability is
    /// invoked. Useful when implementing
    /// [`ExternalStore`](crate::hook::ExternalStore) for foreign sources.
    pub fn from_fn<F>(remove: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            remove: Box::new(remove),
            done: AtomicBool::new(false),
        }
    }

    /// Remove the listener. Subsequent calls do nothing.
    pub fn unsubscribe(&self) {
        if !self.done.swap(true, Ordering::SeqCst) {
            (self.remove)();
        }
    }

    /// Whether [`unsubscribe`](Self::unsubscribe) has already run.
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::SeqCst)
    }

    /// Turn this capability into a guard that unsubscribes when dropped.
    pub fn into_guard(self) -> Subscription {
        Subscription { unsubscribe: self }
    }
}

impl fmt::Debug for Unsubscribe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unsubscribe")
            .field("done", &self.is_done())
            .finish_non_exhaustive()
    }
}

/// RAII guard for a store listener.
pub struct Subscription {
    unsubscribe: Unsubscribe,
}

impl Subscription {
    /// Unsubscribe now instead of waiting for drop.
    pub fn cancel(self) {
        drop(self)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe.unsubscribe();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
