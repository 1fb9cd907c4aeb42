//! Shared types for litegpu: the observable property trigger and its events.
//!
//! # Invariants
//! - Listeners run synchronously, in registration order, on the firing stack.
//! - A `(listener, scope)` pair is registered at most once per event type.

pub mod event;
pub mod trigger;

pub use event::{CHANGE_EVENT, ChangeEvent, PropertyValue, TriggerEvent};
pub use trigger::{Listener, Scope, Trigger};

pub fn crate_info() -> &'static str {
    "litegpu-common v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("common"));
    }
}
