/// Default clock multiplier: orbits run at half wall-clock speed.
pub const DEFAULT_TIME_SCALE: f64 = 0.5;

/// Animation clock driven by the host's per-frame callback.
/// Elapsed time is measured from frame timestamps, never assumed.
#[derive(Debug, Clone)]
pub struct TimeDriver {
    /// Multiplier applied to wall-clock seconds.
    time_scale: f64,
    /// Timestamp (ms) captured by the last `start`.
    start_ms: Option<f64>,
    /// Last elapsed value handed out, in scaled seconds.
    elapsed: f64,
    running: bool,
}

impl TimeDriver {
    pub fn new(time_scale: f64) -> Self {
        Self {
            time_scale,
            start_ms: None,
            elapsed: 0.0,
            running: false,
        }
    }

    /// (Re)start the clock at `timestamp_ms`. Elapsed time resets to zero.
    pub fn start(&mut self, timestamp_ms: f64) {
        self.start_ms = Some(timestamp_ms);
        self.elapsed = 0.0;
        self.running = true;
    }

    /// Cancel future ticks. The last elapsed value stays readable.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Advance to a frame timestamp. Returns scaled elapsed seconds,
    /// or `None` once stopped (or before the first `start`).
    ///
    /// A timestamp older than the previous frame repeats the previous value.
    pub fn tick(&mut self, frame_ms: f64) -> Option<f64> {
        if !self.running {
            return None;
        }
        let start = self.start_ms?;
        let elapsed = (frame_ms - start) / 1000.0 * self.time_scale;
        if elapsed.is_finite() && elapsed > self.elapsed {
            self.elapsed = elapsed;
        }
        Some(self.elapsed)
    }

    /// Last elapsed value, in scaled seconds.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }
}

impl Default for TimeDriver {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_SCALE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_is_scaled_seconds() {
        let mut clock = TimeDriver::new(0.5);
        clock.start(1000.0);
        let t = clock.tick(3000.0).unwrap();
        assert!((t - 1.0).abs() < 1e-12);
    }

    #[test]
    fn default_scale_is_below_one() {
        let clock = TimeDriver::default();
        assert!(clock.time_scale() < 1.0);
    }

    #[test]
    fn tick_before_start_yields_nothing() {
        let mut clock = TimeDriver::new(1.0);
        assert_eq!(clock.tick(500.0), None);
        assert_eq!(clock.elapsed(), 0.0);
    }

    #[test]
    fn never_runs_backwards() {
        let mut clock = TimeDriver::new(1.0);
        clock.start(0.0);
        assert_eq!(clock.tick(2000.0), Some(2.0));
        assert_eq!(clock.tick(1500.0), Some(2.0));
        assert_eq!(clock.tick(f64::NAN), Some(2.0));
        assert_eq!(clock.tick(2500.0), Some(2.5));
    }

    #[test]
    fn stop_cancels_future_ticks() {
        let mut clock = TimeDriver::new(1.0);
        clock.start(0.0);
        clock.tick(1000.0);
        clock.stop();
        assert!(!clock.is_running());
        assert_eq!(clock.tick(5000.0), None);
        assert_eq!(clock.elapsed(), 1.0);
    }

    #[test]
    fn restart_captures_fresh_start() {
        let mut clock = TimeDriver::new(1.0);
        clock.start(0.0);
        clock.tick(10_000.0);
        clock.stop();
        clock.start(20_000.0);
        assert_eq!(clock.elapsed(), 0.0);
        assert_eq!(clock.tick(21_000.0), Some(1.0));
    }

    #[test]
    fn drivers_are_independent() {
        let mut map = TimeDriver::new(1.0);
        let mut preview = TimeDriver::new(0.5);
        map.start(0.0);
        preview.start(1000.0);
        assert_eq!(map.tick(3000.0), Some(3.0));
        assert_eq!(preview.tick(3000.0), Some(1.0));
        preview.stop();
        assert_eq!(map.tick(4000.0), Some(4.0));
    }
}
