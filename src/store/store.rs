use super::listener::{Listener, ListenerSet, Unsubscribe};
use super::options::{StoreBuilder, StoreOptions};
use crate::error::{Result, StoreError};
use crate::hook::SourceKey;
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, trace, warn};

struct StoreInner<T> {
    key: SourceKey,
    value: RwLock<T>,
    version: AtomicU64,
    listeners: Arc<RwLock<ListenerSet>>,
    options: StoreOptions<T>,
}

/// An observable value cell.
///
/// A store holds exactly one value and a set of listeners. Every write
/// replaces the value and then calls each listener synchronously, in the
/// order they subscribed. Cloning a `Store` yields another handle to the
/// same cell.
///
/// No lock is held while listeners run, so a listener may read the store,
/// write it again, or change the listener set. Fan-out iterates the listener
/// set as it was right after the write: listeners added during a fan-out
/// first run on the next write, and listeners removed during a fan-out still
/// run in the current one.
///
/// # Examples
///
/// ```
/// use syncstore::Store;
/// use std::sync::{Arc, Mutex};
///
/// let store = Store::new(0);
/// let log = Arc::new(Mutex::new(Vec::new()));
///
/// let log_clone = log.clone();
/// let unsubscribe = store.subscribe(move || log_clone.lock().unwrap().push("a"));
///
/// store.set_value(5);
/// assert_eq!(store.get_value(), 5);
/// assert_eq!(*log.lock().unwrap(), vec!["a"]);
///
/// unsubscribe.unsubscribe();
/// store.set_value(6);
/// assert_eq!(log.lock().unwrap().len(), 1);
/// ```
pub struct Store<T> {
    inner: Arc<StoreInner<T>>,
}

impl<T> Store<T> {
    /// Create a new store holding `initial`.
    pub fn new(initial: T) -> Self {
        Self::with_options(initial, StoreOptions::default())
    }

    /// Start configuring a store holding `initial`.
    pub fn builder(initial: T) -> StoreBuilder<T> {
        StoreBuilder::new(initial)
    }

    pub(crate) fn with_options(initial: T, options: StoreOptions<T>) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                key: SourceKey::unique(),
                value: RwLock::new(initial),
                version: AtomicU64::new(0),
                listeners: Arc::new(RwLock::new(ListenerSet::default())),
                options,
            }),
        }
    }

    /// Read the current value through a reference, without cloning.
    ///
    /// `f` runs under the value's read lock and must not write this store.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let value = read(&self.inner.value);
        f(&*value)
    }

    /// Replace the value and notify every listener.
    ///
    /// Listeners run before this returns. If one panics, the panic unwinds
    /// out of `set_value` and the listeners after it are not called; the new
    /// value stays in place. See [`try_set_value`](Self::try_set_value) for
    /// the isolating variant.
    pub fn set_value(&self, next: T) {
        if let Some(version) = self.replace(next) {
            self.notify(version);
        }
    }

    /// Replace the value and notify every listener, isolating listener panics.
    ///
    /// Every listener in the snapshot is called even if earlier ones panic.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ListenerPanicked`] if at least one listener
    /// panicked.
    pub fn try_set_value(&self, next: T) -> Result<()> {
        let Some(version) = self.replace(next) else {
            return Ok(());
        };

        let listeners = read(&self.inner.listeners).snapshot();
        let total = listeners.len();
        trace!(store = %self.label(), version, listeners = total, "notifying listeners");

        let mut failed = 0;
        let mut first_message = None;
        for listener in &listeners {
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| listener.call())) {
                let message = panic_message(payload.as_ref());
                warn!(store = %self.label(), version, %message, "listener panicked");
                failed += 1;
                first_message.get_or_insert(message);
            }
        }

        match first_message {
            None => Ok(()),
            Some(message) => Err(StoreError::ListenerPanicked {
                store: self.label().to_owned(),
                failed,
                total,
                message,
            }),
        }
    }

    /// Register `listener` to be called after every write.
    ///
    /// Subscribing a listener that is already registered changes nothing;
    /// the returned capability still removes it.
    pub fn subscribe(&self, listener: impl Into<Listener>) -> Unsubscribe {
        let listener = listener.into();
        {
            let mut listeners = write(&self.inner.listeners);
            if listeners.insert(listener.clone()) {
                trace!(store = %self.label(), listeners = listeners.len(), "listener subscribed");
            } else {
                debug!(store = %self.label(), "listener already subscribed");
            }
        }

        let set = Arc::downgrade(&self.inner.listeners);
        let label = Arc::clone(&self.inner.options.label);
        Unsubscribe::from_fn(move || {
            let Some(set) = set.upgrade() else {
                return;
            };
            let mut listeners = write(&set);
            if listeners.remove(&listener) {
                trace!(store = %label, listeners = listeners.len(), "listener unsubscribed");
            }
        })
    }

    /// Number of value replacements so far. Skipped writes do not count.
    pub fn version(&self) -> u64 {
        self.inner.version.load(Ordering::SeqCst)
    }

    /// Number of currently registered listeners.
    pub fn listener_count(&self) -> usize {
        read(&self.inner.listeners).len()
    }

    /// Name given through [`StoreBuilder::label`], `"store"` by default.
    pub fn label(&self) -> &str {
        &self.inner.options.label
    }

    /// Whether both handles refer to the same cell.
    pub fn ptr_eq(&self, other: &Store<T>) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Key unique to this cell for the life of the process.
    pub fn source_key(&self) -> SourceKey {
        self.inner.key
    }

    /// Write `next` unless the configured equality says it is unchanged.
    /// Returns the new version when the value was replaced.
    fn replace(&self, next: T) -> Option<u64> {
        let mut value = write(&self.inner.value);
        if let Some(equals) = &self.inner.options.equals {
            if equals(&*value, &next) {
                trace!(store = %self.label(), "unchanged value, skipping write");
                return None;
            }
        }
        *value = next;
        Some(self.bump())
    }

    fn bump(&self) -> u64 {
        self.inner.version.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn notify(&self, version: u64) {
        let listeners = read(&self.inner.listeners).snapshot();
        trace!(store = %self.label(), version, listeners = listeners.len(), "notifying listeners");
        for listener in &listeners {
            listener.call();
        }
    }
}

impl<T: Clone> Store<T> {
    /// Get a clone of the current value.
    pub fn get_value(&self) -> T {
        read(&self.inner.value).clone()
    }

    /// Modify a copy of the value, then write it back like
    /// [`set_value`](Self::set_value).
    ///
    /// No lock is held while `f` runs, so `f` may read the store.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let mut next = self.get_value();
        f(&mut next);
        self.set_value(next);
    }
}

/// Create a new store holding `initial`.
///
/// Equivalent to [`Store::new`].
pub fn create_store<T>(initial: T) -> Store<T> {
    Store::new(initial)
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("label", &self.label())
            .field("value", &*read(&self.inner.value))
            .field("version", &self.version())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

// Listeners never run under these locks, so a poisoned lock only means a
// panic in `Clone` or an equality function; the data is still whole.
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}
