//! # Syncstore
//!
//! Observable value stores and a hook-style binding for component hosts.
//!
//! ## Store
//!
//! [`Store<T>`] holds a single value and a set of zero-argument listeners:
//! - Every write replaces the value and calls each listener synchronously,
//!   in subscription order
//! - Subscribing returns an [`Unsubscribe`] capability; calling it twice is
//!   harmless, and subscribing the same [`Listener`] twice registers it once
//! - [`Store::builder`] configures a label for logs and optional
//!   skip-if-unchanged writes
//!
//! ## Hook
//!
//! [`use_store`] adapts a store to the value/setter pair components expect.
//! The setter takes either a value or an update function, see
//! [`SetStateAction`]. The component framework is abstracted by
//! [`hook::Host`]; [`runtime::Component`] is a minimal host.

pub mod error;
pub mod hook;
pub mod runtime;
pub mod store;

// Re-export main types for convenience
pub use error::{Result, StoreError};
pub use hook::{use_store, use_store_with, SetStateAction, SetStore};
pub use store::{create_store, Listener, Store, StoreBuilder, Subscription, Unsubscribe};
