//! Time management utilities

use std::time::{Duration, Instant};

/// Frame timer driving `Engine::tick`
#[derive(Debug)]
pub struct Timer {
    last_frame: Instant,
    delta_time: f64,
    total_time: f64,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer starting now
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Wall-clock seconds since the previous measurement
    ///
    /// Does not count a frame; pass the result to [`Timer::advance`].
    pub fn measure(&mut self) -> f64 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame).as_secs_f64();
        self.last_frame = now;
        elapsed
    }

    /// Account for a frame of externally supplied length
    ///
    /// Hosts that own their own clock (an animation-frame callback, a fixed
    /// step loop) report time through here without calling `measure`.
    pub fn advance(&mut self, delta_time: f64) {
        self.delta_time = delta_time;
        self.total_time += delta_time;
        self.frame_count += 1;
    }

    /// Seconds covered by the last frame
    pub fn delta_time(&self) -> f64 {
        self.delta_time
    }

    /// Seconds accumulated since creation
    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    /// Frames counted so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

/// Simple stopwatch for measuring elapsed time
#[derive(Debug)]
pub struct Stopwatch {
    start_time: Instant,
}

impl Stopwatch {
    /// Start a new stopwatch
    pub fn start_new() -> Self {
        Self { start_time: Instant::now() }
    }

    /// Time since the stopwatch was started
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Elapsed time in whole microseconds
    pub fn elapsed_micros(&self) -> u64 {
        u64::try_from(self.elapsed().as_micros()).unwrap_or(u64::MAX)
    }
}
