//! Pointer input: mouse, touch and wheel events reduced to one normalized stream.
//!
//! # Invariants
//! - Consumers only ever see [`PointerEvent`]s, never raw windowing events.
//! - Mouse and touch both resolve to a single client point per event.

pub mod platform;
pub mod pointer;

pub use platform::PointerTracker;
pub use pointer::{ClientPoint, PointerButton, PointerEvent};

pub fn crate_info() -> &'static str {
    "litegpu-input v0.1.0"
}
