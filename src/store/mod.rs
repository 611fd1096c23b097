//! Observable value stores.
//!
//! A [`Store`] holds one value and calls its listeners synchronously, in
//! subscription order, after every write. Listeners are zero-argument
//! callbacks; they read the store themselves if they need the new value.

mod listener;
mod options;
mod store;

pub use listener::{Listener, Subscription, Unsubscribe};
pub use options::StoreBuilder;
pub use store::{create_store, Store};
