//! Connection dispatch.

pub mod listener;

pub use listener::{Listener, ListenerError, run};
