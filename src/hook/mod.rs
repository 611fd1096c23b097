//! Hook-style binding between stores and component hosts.
//!
//! [`use_store`] hands a component the current value of a [`Store`](crate::Store)
//! together with a [`SetStore`] setter, and subscribes the component so it
//! re-renders whenever the store is written. The component framework itself
//! sits behind the [`Host`] trait; [`Component`](crate::runtime::Component)
//! is a minimal implementation.

mod action;
mod host;
mod use_store;

pub use action::SetStateAction;
pub use host::{use_sync_external_store, ExternalStore, Host, SourceKey};
pub use use_store::{use_store, use_store_with, SetStore};
