/// How host frames map onto simulation steps.
///
/// Body speeds are expressed in radians per step. `PerFrame` runs one step per
/// host frame, so motion speed follows the display refresh rate. `Fixed`
/// accumulates real time and runs as many steps as fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameMode {
    PerFrame,
    Fixed { dt: f32 },
}

impl Default for FrameMode {
    fn default() -> Self {
        FrameMode::PerFrame
    }
}

/// Fixed timestep accumulator.
/// Ensures simulation steps run at a consistent rate regardless of frame time.
pub struct FixedTimestep {
    /// The fixed delta time per step.
    dt: f32,
    /// Accumulated time from variable frame deltas.
    accumulator: f32,
}

impl FixedTimestep {
    /// Cap on steps per frame after a long stall (e.g. a background tab).
    pub const MAX_STEPS: u32 = 10;

    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
        }
    }

    /// Add frame time to the accumulator. Returns the number of steps to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.max(0.0);
        self.accumulator = self.accumulator.min(self.dt * Self::MAX_STEPS as f32);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }
}

/// Turns host frame timestamps (milliseconds, as passed to
/// `requestAnimationFrame` callbacks) into per-frame deltas in seconds.
#[derive(Debug, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
    frames: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a frame timestamp and return seconds since the previous one.
    /// The first frame, and any timestamp that runs backwards, yields 0.
    pub fn delta(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) if now_ms > last => ((now_ms - last) / 1000.0) as f32,
            _ => 0.0,
        };
        self.last_ms = Some(now_ms);
        self.frames += 1;
        dt
    }

    /// Number of frames seen so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_step_exact() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        assert_eq!(ts.accumulate(1.0 / 60.0), 1);
    }

    #[test]
    fn accumulates_partial() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        assert_eq!(ts.accumulate(0.008), 0);
        assert_eq!(ts.accumulate(0.010), 1);
    }

    #[test]
    fn caps_steps_after_stall() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        assert_eq!(ts.accumulate(1.0), FixedTimestep::MAX_STEPS);
    }

    #[test]
    fn negative_frame_time_is_ignored() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        assert_eq!(ts.accumulate(-5.0), 0);
        // Nothing was borrowed from the next step
        assert_eq!(ts.accumulate(1.0 / 60.0), 1);
    }

    #[test]
    fn clock_first_frame_is_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.delta(1000.0), 0.0);
        let dt = clock.delta(1016.0);
        assert!((dt - 0.016).abs() < 1e-6);
        assert_eq!(clock.frames(), 2);
    }

    #[test]
    fn clock_ignores_backwards_time() {
        let mut clock = FrameClock::new();
        clock.delta(500.0);
        assert_eq!(clock.delta(400.0), 0.0);
        let dt = clock.delta(450.0);
        assert!((dt - 0.05).abs() < 1e-6);
    }
}
