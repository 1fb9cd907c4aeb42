/// Weight kept from the previous average on every sample.
const KEEP: f64 = 0.8;

/// Smoothed frame timings, in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    /// Wall time spent inside the frame callback.
    pub avg_callback_ms: f64,
    /// Host time elapsed between callback invocations.
    pub avg_frame_ms: f64,
}

impl FrameStats {
    /// Fold one sample into both moving averages.
    pub fn record(&mut self, callback_ms: f64, frame_ms: f64) {
        self.avg_callback_ms = self.avg_callback_ms * KEEP + callback_ms * (1.0 - KEEP);
        self.avg_frame_ms = self.avg_frame_ms * KEEP + frame_ms * (1.0 - KEEP);
    }
}

impl std::fmt::Display for FrameStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CPU: {:.2} ms  Draw: {:.2} ms",
            self.avg_callback_ms, self.avg_frame_ms
        )
    }
}
