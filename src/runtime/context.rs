use crate::hook::Host;
use std::cell::RefCell;
use std::rc::Rc;

// Hosts that are currently rendering, innermost last.
thread_local! {
    static HOST_STACK: RefCell<Vec<Rc<dyn Host>>> = RefCell::new(vec![]);
}

/// Run `f` with `host` as the current host.
///
/// The host is pushed onto a thread-local stack for the duration of `f`, so
/// nested renders see the innermost host. The stack is restored even if `f`
/// panics.
///
/// # Examples
///
/// ```
/// use syncstore::hook::{Host, SourceKey};
/// use syncstore::runtime;
/// use syncstore::{Listener, Unsubscribe};
/// use std::rc::Rc;
///
/// struct Inert;
///
/// impl Host for Inert {
///     fn attach(&self, _: SourceKey, _: &mut dyn FnMut(Listener) -> Unsubscribe) {}
/// }
///
/// assert!(runtime::current_host().is_none());
/// runtime::with_host(Rc::new(Inert), || {
///     assert!(runtime::current_host().is_some());
/// });
/// assert!(runtime::current_host().is_none());
/// ```
pub fn with_host<F, R>(host: Rc<dyn Host>, f: F) -> R
where
    F: FnOnce() -> R,
{
    HOST_STACK.with(|stack| stack.borrow_mut().push(host));
    let _pop = PopOnDrop;
    f()
}

// Pops the host pushed by `with_host`, also while unwinding.
struct PopOnDrop;

impl Drop for PopOnDrop {
    fn drop(&mut self) {
        HOST_STACK.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

/// The innermost host currently rendering on this thread, if any.
pub fn current_host() -> Option<Rc<dyn Host>> {
    HOST_STACK.with(|stack| stack.borrow().last().cloned())
}

/// Call `f` with the current host.
///
/// The stack is not borrowed while `f` runs, so `f` may start nested renders.
pub fn with_current_host<R>(f: impl FnOnce(Option<&dyn Host>) -> R) -> R {
    let host = current_host();
    f(host.as_deref())
}
