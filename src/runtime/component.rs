use super::context::with_host;
use crate::hook::{Host, SourceKey};
use crate::store::{Listener, Subscription, Unsubscribe};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

struct ComponentInner<V> {
    render: Box<dyn Fn() -> V>,
    output: RefCell<Option<V>>,
    // Set by store listeners, cleared when a render starts.
    dirty: Arc<AtomicBool>,
    renders: Cell<usize>,
    subscriptions: RefCell<HashMap<SourceKey, Subscription>>,
    // Sources attached by the render in progress.
    attached: RefCell<HashSet<SourceKey>>,
}

impl<V> Host for ComponentInner<V> {
    fn attach(&self, key: SourceKey, subscribe: &mut dyn FnMut(Listener) -> Unsubscribe) {
        self.attached.borrow_mut().insert(key);
        if self.subscriptions.borrow().contains_key(&key) {
            return;
        }

        let dirty = Arc::clone(&self.dirty);
        let unsubscribe = subscribe(Listener::new(move || {
            dirty.store(true, Ordering::SeqCst);
        }));
        self.subscriptions
            .borrow_mut()
            .insert(key, unsubscribe.into_guard());
    }
}

/// A minimal host: a render function plus the subscriptions it made.
///
/// Mounting renders once. Writes to any store the last render used mark the
/// component dirty; [`flush`](Self::flush) then renders it again. Stores a
/// render stops using are unsubscribed after that render, and dropping the
/// component unsubscribes from everything.
///
/// # Examples
///
/// ```
/// use syncstore::runtime::Component;
/// use syncstore::{use_store, Store};
///
/// let name = Store::new("ada".to_string());
/// let greeting = Component::mount({
///     let name = name.clone();
///     move || format!("hello {}", use_store(&name).0)
/// });
/// assert_eq!(greeting.output(), "hello ada");
///
/// name.set_value("grace".to_string());
/// assert!(greeting.is_dirty());
/// greeting.flush();
/// assert_eq!(greeting.output(), "hello grace");
/// ```
pub struct Component<V> {
    inner: Rc<ComponentInner<V>>,
}

impl<V: 'static> Component<V> {
    /// Create the component and render it for the first time.
    pub fn mount<F>(render: F) -> Self
    where
        F: Fn() -> V + 'static,
    {
        let component = Self {
            inner: Rc::new(ComponentInner {
                render: Box::new(render),
                output: RefCell::new(None),
                dirty: Arc::new(AtomicBool::new(false)),
                renders: Cell::new(0),
                subscriptions: RefCell::new(HashMap::new()),
                attached: RefCell::new(HashSet::new()),
            }),
        };
        component.render();
        component
    }

    /// Render again if a subscribed store changed since the last render.
    ///
    /// Returns whether a render happened.
    pub fn flush(&self) -> bool {
        if self.inner.dirty.swap(false, Ordering::SeqCst) {
            self.render();
            true
        } else {
            false
        }
    }

    /// Render unconditionally.
    pub fn render(&self) {
        let inner = &self.inner;
        inner.dirty.store(false, Ordering::SeqCst);
        inner.attached.borrow_mut().clear();

        let host: Rc<dyn Host> = Rc::clone(inner) as Rc<dyn Host>;
        let output = with_host(host, || (inner.render)());
        *inner.output.borrow_mut() = Some(output);
        inner.renders.set(inner.renders.get() + 1);

        let attached = inner.attached.borrow();
        let stale: Vec<Subscription> = {
            let mut subscriptions = inner.subscriptions.borrow_mut();
            let keys: Vec<SourceKey> = subscriptions
                .keys()
                .filter(|key| !attached.contains(key))
                .copied()
                .collect();
            keys.iter()
                .filter_map(|key| subscriptions.remove(key))
                .collect()
        };
        debug!(
            renders = inner.renders.get(),
            subscriptions = inner.subscriptions.borrow().len(),
            released = stale.len(),
            "component rendered"
        );
    }

    /// Whether a subscribed store changed since the last render.
    pub fn is_dirty(&self) -> bool {
        self.inner.dirty.load(Ordering::SeqCst)
    }

    /// Number of renders so far, the mount included.
    pub fn render_count(&self) -> usize {
        self.inner.renders.get()
    }

    /// Number of sources the component is subscribed to.
    pub fn subscription_count(&self) -> usize {
        self.inner.subscriptions.borrow().len()
    }

    /// Read the last render's output.
    pub fn with_output<R>(&self, f: impl FnOnce(&V) -> R) -> R {
        let output = self.inner.output.borrow();
        match output.as_ref() {
            Some(output) => f(output),
            None => unreachable!("components render on mount"),
        }
    }

    /// Drop every subscription and the component with them.
    pub fn unmount(self) {
        self.inner.subscriptions.borrow_mut().clear();
    }
}

impl<V: Clone + 'static> Component<V> {
    /// Clone of the last render's output.
    pub fn output(&self) -> V {
        self.with_output(V::clone)
    }
}

impl<V> fmt::Debug for Component<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("renders", &self.inner.renders.get())
            .field("dirty", &self.inner.dirty.load(Ordering::SeqCst))
            .field("subscriptions", &self.inner.subscriptions.borrow().len())
            .finish_non_exhaustive()
    }
}
