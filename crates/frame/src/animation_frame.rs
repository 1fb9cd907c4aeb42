use crate::stats::FrameStats;
use std::time::Instant;

/// Any requested rate at or above this runs as fast as the host allows.
pub const UNCAPPED_FPS: f64 = 60.0;

/// Minimum host time between two published [`FrameStats`] snapshots.
const STATS_PUBLISH_MS: f64 = 100.0;

/// Host-side "next frame" primitive.
pub trait FrameHost {
    /// Ask the host to deliver one more frame notification.
    fn request_frame(&self);

    /// Drop a pending request, if the host supports it.
    fn cancel_frame(&self) {}
}

impl FrameHost for winit::window::Window {
    fn request_frame(&self) {
        self.request_redraw();
    }
}

/// Fixed-rate callback loop driven by host frame notifications.
///
/// The host calls [`AnimationFrame::on_host_frame`] whenever it delivers a
/// frame; the scheduler re-requests the next one immediately and decides
/// whether enough time has passed to run the callback.
#[derive(Debug)]
pub struct AnimationFrame {
    fps: f64,
    interval_ms: f64,
    elapsed_ms: f64,
    last_time_ms: f64,
    running: bool,
    debug: bool,
    samples: FrameStats,
    published: FrameStats,
    last_publish_ms: f64,
}

impl Default for AnimationFrame {
    fn default() -> Self {
        Self::new(30.0, false)
    }
}

impl AnimationFrame {
    pub fn new(fps: f64, debug: bool) -> Self {
        let mut frame = Self {
            fps: 0.0,
            interval_ms: 0.0,
            elapsed_ms: 0.0,
            last_time_ms: 0.0,
            running: false,
            debug,
            samples: FrameStats::default(),
            published: FrameStats::default(),
            last_publish_ms: 0.0,
        };
        frame.set_fps(fps);
        frame
    }

    /// Target rate; 0 means uncapped.
    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Set the target rate. Rates of 60 and above are treated as uncapped.
    pub fn set_fps(&mut self, fps: f64) {
        self.fps = if fps >= UNCAPPED_FPS { 0.0 } else { fps };
        self.interval_ms = if self.fps > 0.0 { 1000.0 / self.fps } else { 0.0 };
    }

    /// Minimum host time between callbacks, in milliseconds.
    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Host time accumulated since the last callback, in milliseconds.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    /// Latest published timings. Only maintained in debug mode.
    pub fn stats(&self) -> Option<FrameStats> {
        self.debug.then_some(self.published)
    }

    /// Begin the loop by requesting a host frame.
    ///
    /// Every call requests another frame; do not call twice without `stop`.
    pub fn start(&mut self, host: &dyn FrameHost) {
        self.running = true;
        host.request_frame();
        tracing::debug!(fps = self.fps, "animation frame started");
    }

    /// Stop scheduling. Frames the host still delivers are ignored.
    pub fn stop(&mut self, host: &dyn FrameHost) {
        self.running = false;
        host.cancel_frame();
        tracing::debug!("animation frame stopped");
    }

    /// Handle one host frame at `time_ms`.
    ///
    /// Returns `true` if `callback` ran.
    pub fn on_host_frame<F>(&mut self, time_ms: f64, host: &dyn FrameHost, callback: F) -> bool
    where
        F: FnOnce(f64),
    {
        if !self.running {
            return false;
        }
        host.request_frame();

        self.elapsed_ms += time_ms - self.last_time_ms;
        self.last_time_ms = time_ms;
        if self.elapsed_ms < self.interval_ms {
            return false;
        }

        let start = Instant::now();
        callback(time_ms);

        if self.debug {
            let callback_ms = start.elapsed().as_secs_f64() * 1000.0;
            self.samples.record(callback_ms, self.elapsed_ms);
            if time_ms - self.last_publish_ms > STATS_PUBLISH_MS {
                self.published = self.samples;
                self.last_publish_ms = time_ms;
                tracing::debug!(
                    callback_ms = self.published.avg_callback_ms,
                    frame_ms = self.published.avg_frame_ms,
                    "frame stats"
                );
            }
        }

        if self.interval_ms > 0.0 {
            self.elapsed_ms %= self.interval_ms;
        } else {
            self.elapsed_ms = 0.0;
        }
        true
    }
}
