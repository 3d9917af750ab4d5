//! Fixed simulation timestep
//!
//! Converts variable host frame times into a whole number of fixed ticks.

/// Accumulates frame time and hands out fixed-length ticks.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: f32,
    accumulator: f32,
    ticks: u64,
    /// Upper bound on ticks per frame, so a long stall cannot spiral
    max_ticks_per_frame: u32,
}

impl FixedTimestep {
    /// Create a timestep running at `tick_rate` ticks per second.
    #[must_use]
    pub fn new(tick_rate: u32) -> Self {
        Self {
            step: 1.0 / tick_rate.max(1) as f32,
            accumulator: 0.0,
            ticks: 0,
            max_ticks_per_frame: 8,
        }
    }

    /// Length of one tick in seconds.
    #[must_use]
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Ticks handed out so far.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Simulated time in seconds.
    #[must_use]
    pub fn elapsed(&self) -> f32 {
        self.ticks as f32 * self.step
    }

    /// Add a frame's delta and return how many ticks to run now.
    pub fn accumulate(&mut self, frame_delta: f32) -> u32 {
        self.accumulator += frame_delta.max(0.0);

        let mut due = 0;
        while self.accumulator >= self.step && due < self.max_ticks_per_frame {
            self.accumulator -= self.step;
            due += 1;
        }
        if due == self.max_ticks_per_frame {
            self.accumulator = 0.0;
        }

        self.ticks += u64::from(due);
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_partial_frames() {
        let mut clock = FixedTimestep::new(4);

        assert_eq!(clock.accumulate(0.125), 0);
        assert_eq!(clock.accumulate(0.125), 1);
        assert_eq!(clock.accumulate(0.5), 2);
        assert_eq!(clock.ticks(), 3);
        assert!((clock.elapsed() - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_long_stall_is_capped() {
        let mut clock = FixedTimestep::new(60);

        assert_eq!(clock.accumulate(10.0), 8);
        assert_eq!(clock.accumulate(0.0), 0);
    }

    #[test]
    fn test_zero_tick_rate_does_not_divide_by_zero() {
        let clock = FixedTimestep::new(0);
        assert!((clock.step() - 1.0).abs() < f32::EPSILON);
    }
}
