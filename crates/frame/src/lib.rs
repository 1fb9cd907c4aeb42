//! Animation Scheduler: turns host frame notifications into a rate-capped callback loop.
//!
//! # Invariants
//! - The user callback fires at most once per configured interval.
//! - Elapsed time carries over modulo the interval, so the rate does not drift.
//! - Stopping prevents future callbacks; it never cancels submitted GPU work.

mod animation_frame;
mod stats;

pub use animation_frame::{AnimationFrame, FrameHost, UNCAPPED_FPS};
pub use stats::FrameStats;

pub fn crate_info() -> &'static str {
    "litegpu-frame v0.1.0"
}
