use crate::store::{Listener, Store, Unsubscribe};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

static NEXT_KEY: AtomicU64 = AtomicU64::new(0);

/// Identity of an external source, used by hosts to keep one subscription
/// per source across renders.
///
/// Keys are never reused, so a host can not mistake a new source for one
/// that was dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SourceKey(u64);

impl SourceKey {
    /// Allocate a key no other source has had.
    pub fn unique() -> Self {
        SourceKey(NEXT_KEY.fetch_add(1, Ordering::Relaxed))
    }
}

/// A mutable source a host can subscribe to.
///
/// This is the whole surface a host needs: a way to be told about changes
/// and a way to read the current snapshot.
pub trait ExternalStore<T> {
    /// Stable identity of this source; clones of a handle share it.
    fn source_key(&self) -> SourceKey;

    /// Register `listener` to run after every change.
    fn subscribe(&self, listener: Listener) -> Unsubscribe;

    /// Read the current value.
    fn get_snapshot(&self) -> T;
}

impl<T: Clone> ExternalStore<T> for Store<T> {
    fn source_key(&self) -> SourceKey {
        Store::source_key(self)
    }

    fn subscribe(&self, listener: Listener) -> Unsubscribe {
        Store::subscribe(self, listener)
    }

    fn get_snapshot(&self) -> T {
        self.get_value()
    }
}

/// The component framework's "subscribe to an external source" primitive.
///
/// When a component that is rendering attaches a source, the host must make
/// sure the component renders again whenever the listener it passes to
/// `subscribe` fires. Hosts are expected to call `subscribe` once per source
/// key and keep the subscription until the source is no longer used.
pub trait Host {
    fn attach(&self, key: SourceKey, subscribe: &mut dyn FnMut(Listener) -> Unsubscribe);
}

/// Subscribe the rendering component to `source` and return its snapshot.
///
/// The source is attached before it is read, so a write that lands between
/// the two still schedules a render. Without a host the snapshot is returned
/// and nothing is subscribed.
pub fn use_sync_external_store<T, S>(host: Option<&dyn Host>, source: &S) -> T
where
    S: ExternalStore<T> + ?Sized,
{
    match host {
        Some(host) => host.attach(source.source_key(), &mut |listener| {
            source.subscribe(listener)
        }),
        None => debug!("no host is rendering, reading snapshot without subscribing"),
    }
    source.get_snapshot()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Host that subscribes once per key and records the handles.
    #[derive(Default)]
    struct RecordingHost {
        subscriptions: RefCell<HashMap<SourceKey, Unsubscribe>>,
    }

    impl Host for RecordingHost {
        fn attach(&self, key: SourceKey, subscribe: &mut dyn FnMut(Listener) -> Unsubscribe) {
            let mut subscriptions = self.subscriptions.borrow_mut();
            if !subscriptions.contains_key(&key) {
                subscriptions.insert(key, subscribe(Listener::new(|| {})));
            }
        }
    }

    #[test]
    fn attaches_once_per_source() {
        let host = RecordingHost::default();
        let store = Store::new(4);

        assert_eq!(use_sync_external_store(Some(&host), &store), 4);
        assert_eq!(use_sync_external_store(Some(&host), &store.clone()), 4);
        assert_eq!(store.listener_count(), 1);
        assert_eq!(host.subscriptions.borrow().len(), 1);
    }

    #[test]
    fn distinct_stores_have_distinct_keys() {
        let a = Store::new(0);
        let b = Store::new(0);
        assert_ne!(a.source_key(), b.source_key());
        assert_eq!(a.source_key(), a.clone().source_key());
    }

    #[test]
    fn dropped_store_key_is_not_reused() {
        let keys: Vec<SourceKey> = (0..64)
            .map(|i| ExternalStore::source_key(&Store::new(i)))
            .collect();
        let mut unique = keys.clone();
        unique.sort_by_key(|key| key.0);
        unique.dedup();
        assert_eq!(unique.len(), keys.len());
    }

    #[test]
    fn without_host_only_reads() {
        let store = Store::new("x");
        assert_eq!(use_sync_external_store(None, &store), "x");
        assert_eq!(store.listener_count(), 0);
    }
}
