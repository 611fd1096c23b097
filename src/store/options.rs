use super::Store;
use std::sync::Arc;

type Equals<T> = Arc<dyn Fn(&T, &T) -> bool + Send + Sync>;

const DEFAULT_LABEL: &str = "store";

/// Per-store configuration.
///
/// The defaults reproduce the plain store contract: every write notifies,
/// even when the value did not change.
pub(crate) struct StoreOptions<T> {
    pub(crate) label: Arc<str>,
    pub(crate) equals: Option<Equals<T>>,
}

impl<T> Default for StoreOptions<T> {
    fn default() -> Self {
        Self {
            label: Arc::from(DEFAULT_LABEL),
            equals: None,
        }
    }
}

/// Builder for a configured [`Store`].
///
/// # Examples
///
/// ```
/// use syncstore::Store;
///
/// let store = Store::builder(0).label("counter").skip_unchanged().build();
/// assert_eq!(store.label(), "counter");
/// ```
pub struct StoreBuilder<T> {
    initial: T,
    options: StoreOptions<T>,
}

impl<T> StoreBuilder<T> {
    pub(crate) fn new(initial: T) -> Self {
        Self {
            initial,
            options: StoreOptions::default(),
        }
    }

    /// Name used in log fields and error messages.
    pub fn label(mut self, label: impl Into<Arc<str>>) -> Self {
        self.options.label = label.into();
        self
    }

    /// Treat writes where `equals(current, next)` holds as no-ops: the value
    /// is kept, the version is not bumped, and no listener runs.
    pub fn equals<F>(mut self, equals: F) -> Self
    where
        F: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        self.options.equals = Some(Arc::new(equals));
        self
    }

    /// Skip writes of a value equal to the current one.
    pub fn skip_unchanged(self) -> Self
    where
        T: PartialEq,
    {
        self.equals(|current, next| current == next)
    }

    /// Create the configured store.
    pub fn build(self) -> Store<T> {
        Store::with_options(self.initial, self.options)
    }
}
