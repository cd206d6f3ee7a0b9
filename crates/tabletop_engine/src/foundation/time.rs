//! Time management utilities

/// Frame clock producing the per-frame delta used for camera movement
///
/// Timestamps come from the caller (the window layer's clock, in seconds) so
/// the clock can be driven deterministically in tests. The delta is clamped
/// to `[0, max_delta]`: a regressing timestamp yields zero and a long stall
/// (debugger pause, window drag) yields at most `max_delta`.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_frame: Option<f64>,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
    max_delta: f32,
}

impl FrameClock {
    /// Create a new clock with the given delta ceiling in seconds
    #[must_use]
    pub const fn new(max_delta: f32) -> Self {
        Self {
            last_frame: None,
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
            max_delta,
        }
    }

    /// Advance the clock to `now` and return the clamped delta
    ///
    /// The first tick only latches the timestamp and reports zero.
    #[allow(clippy::cast_possible_truncation)]
    pub fn tick(&mut self, now: f64) -> f32 {
        let raw = self.last_frame.map_or(0.0, |last| (now - last) as f32);
        if raw < 0.0 || raw > self.max_delta {
            log::debug!("Clamping frame delta {:.4}s to [0, {:.4}]", raw, self.max_delta);
        }
        self.delta_time = raw.clamp(0.0, self.max_delta);
        self.total_time += self.delta_time;
        self.last_frame = Some(now);
        self.frame_count += 1;
        self.delta_time
    }

    /// Get the time since the last frame in seconds
    #[must_use]
    pub const fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total clamped time accumulated by the clock
    #[must_use]
    pub const fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the current frame count
    #[must_use]
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the average FPS since the first tick
    #[must_use]
    pub fn average_fps(&self) -> f32 {
        if self.total_time > 0.0 {
            self.frame_count as f32 / self.total_time
        } else {
            0.0
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(0.25)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_first_tick_latches() {
        let mut clock = FrameClock::new(0.25);
        assert_relative_eq!(clock.tick(42.0), 0.0, epsilon = EPSILON);
        assert_relative_eq!(clock.tick(42.016), 0.016, epsilon = 1e-5);
        assert_eq!(clock.frame_count(), 2);
    }

    #[test]
    fn test_regressing_timestamp_yields_zero() {
        let mut clock = FrameClock::new(0.25);
        clock.tick(10.0);
        assert_relative_eq!(clock.tick(9.5), 0.0, epsilon = EPSILON);
        // Deltas are measured from the regressed timestamp afterwards
        assert_relative_eq!(clock.tick(9.6), 0.1, epsilon = 1e-5);
    }

    #[test]
    fn test_long_stall_is_clamped() {
        let mut clock = FrameClock::new(0.25);
        clock.tick(1.0);
        assert_relative_eq!(clock.tick(31.0), 0.25, epsilon = EPSILON);
        assert_relative_eq!(clock.total_time(), 0.25, epsilon = EPSILON);
    }
}
