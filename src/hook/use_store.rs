use super::action::SetStateAction;
use super::host::{use_sync_external_store, Host};
use crate::runtime;
use crate::store::Store;

/// Setter returned by [`use_store`].
///
/// Accepts anything convertible into a [`SetStateAction`]: a plain value
/// replaces the store's value, an update function derives the next value
/// from the current one.
pub struct SetStore<T> {
    store: Store<T>,
}

impl<T: Clone> SetStore<T> {
    /// Setter writing into `store`.
    pub fn new(store: Store<T>) -> Self {
        Self { store }
    }

    /// Write the next value into the store, notifying its listeners.
    pub fn set(&self, action: impl Into<SetStateAction<T>>) {
        let next = action.into().resolve(|| self.store.get_value());
        self.store.set_value(next);
    }

    /// Shorthand for `set(SetStateAction::update(f))` that does not box `f`.
    pub fn update(&self, f: impl FnOnce(T) -> T) {
        let next = f(self.store.get_value());
        self.store.set_value(next);
    }

    /// The store this setter writes.
    pub fn store(&self) -> &Store<T> {
        &self.store
    }
}

impl<T> Clone for SetStore<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

/// Bind `store` to the component currently rendering on this thread.
///
/// Returns the store's current value and a setter. The component renders
/// again whenever the store is written. Called outside of a render, the
/// value is read but nothing is subscribed.
///
/// # Examples
///
/// ```
/// use syncstore::runtime::Component;
/// use syncstore::{use_store, Store};
///
/// let store = Store::new(1);
/// let component = Component::mount({
///     let store = store.clone();
///     move || use_store(&store)
/// });
///
/// let (value, set_value) = component.output();
/// assert_eq!(value, 1);
///
/// set_value.set(5);
/// assert!(component.flush());
/// assert_eq!(component.output().0, 5);
/// ```
pub fn use_store<T>(store: &Store<T>) -> (T, SetStore<T>)
where
    T: Clone,
{
    let value = runtime::with_current_host(|host| use_sync_external_store(host, store));
    (value, SetStore::new(store.clone()))
}

/// Like [`use_store`], with an explicit host instead of the rendering one.
pub fn use_store_with<T>(host: &dyn Host, store: &Store<T>) -> (T, SetStore<T>)
where
    T: Clone,
{
    let value = use_sync_external_store(Some(host), store);
    (value, SetStore::new(store.clone()))
}
