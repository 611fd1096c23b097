//! Render-time context for hosts.
//!
//! Hooks find the host that is currently rendering through a thread-local
//! stack. [`Component`] is a small host that renders on demand and can stand
//! in for a UI framework in tests and demos.

mod component;
mod context;

pub use component::Component;
pub use context::{current_host, with_current_host, with_host};
