use std::fmt;

/// Argument accepted by a [`SetStore`](super::SetStore): either the next
/// value itself, or a function computing it from the current value.
///
/// Plain values convert into [`SetStateAction::Value`] through `From`, so a
/// setter can be called with a value directly.
///
/// # Examples
///
/// ```
/// use syncstore::SetStateAction;
///
/// let literal: SetStateAction<i32> = 5.into();
/// assert_eq!(literal.resolve(|| 1), 5);
///
/// let update = SetStateAction::update(|n: i32| n + 1);
/// assert_eq!(update.resolve(|| 1), 2);
/// ```
pub enum SetStateAction<T> {
    /// Replace the current value.
    Value(T),
    /// Compute the next value from the current one.
    Update(Box<dyn FnOnce(T) -> T>),
}

impl<T> SetStateAction<T> {
    /// Wrap `f` as an update of the current value.
    pub fn update<F>(f: F) -> Self
    where
        F: FnOnce(T) -> T + 'static,
    {
        SetStateAction::Update(Box::new(f))
    }

    /// Whether this action reads the current value.
    pub fn is_update(&self) -> bool {
        matches!(self, SetStateAction::Update(_))
    }

    /// Produce the next value. `current` is only called for updates.
    pub fn resolve(self, current: impl FnOnce() -> T) -> T {
        match self {
            SetStateAction::Value(value) => value,
            SetStateAction::Update(f) => f(current()),
        }
    }
}

impl<T> From<T> for SetStateAction<T> {
    fn from(value: T) -> Self {
        SetStateAction::Value(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for SetStateAction<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetStateAction::Value(value) => f.debug_tuple("Value").field(value).finish(),
            SetStateAction::Update(_) => f.write_str("Update(..)"),
        }
    }
}
