//! Checkpoint timing for the batch stages

use std::time::Instant;

/// Logs the elapsed time between checkpoints at info level.
pub struct Stopwatch {
    start: Instant,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Log how long the phase since the last checkpoint took, then restart.
    pub fn checkpoint(&mut self, what: &str) {
        let elapsed = self.start.elapsed();
        log::info!("{} took {:.2} seconds", what, elapsed.as_secs_f64());
        self.start = Instant::now();
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}
