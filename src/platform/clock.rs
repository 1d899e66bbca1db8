//! Frame clock
//!
//! The host calls `tick` once per display frame with its timestamp in
//! milliseconds; the clock answers with the elapsed seconds.

#[derive(Debug, Clone)]
pub struct FrameClock {
    last_timestamp: Option<f64>,
    dt: f32,
    max_dt: f32,
}

impl FrameClock {
    /// `max_dt` caps long stalls (hidden tab, debugger)
    pub fn new(max_dt: f32) -> Self {
        Self {
            last_timestamp: None,
            dt: 0.0,
            max_dt: max_dt.max(0.0),
        }
    }

    /// Seconds since the previous tick, in `[0, max_dt]`.
    /// The first tick only seeds the clock and returns 0. Non-finite
    /// timestamps are ignored and yield 0.
    pub fn tick(&mut self, timestamp_ms: f64) -> f32 {
        if !timestamp_ms.is_finite() {
            log::warn!("Ignoring non-finite frame timestamp {}", timestamp_ms);
            self.dt = 0.0;
            return 0.0;
        }
        let dt = match self.last_timestamp {
            Some(last) => ((timestamp_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_timestamp = Some(timestamp_ms);

        if dt > self.max_dt {
            log::debug!("Frame took {:.3}s, clamping to {:.3}s", dt, self.max_dt);
        }
        self.dt = dt.clamp(0.0, self.max_dt);
        self.dt
    }

    /// Last reported dt
    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Frames per second derived from the last dt (0 before two ticks)
    pub fn fps(&self) -> f32 {
        if self.dt > 0.0 { 1.0 / self.dt } else { 0.0 }
    }

    /// Forget the previous timestamp (e.g. after resuming from background)
    pub fn reset(&mut self) {
        self.last_timestamp = None;
        self.dt = 0.0;
    }
}
