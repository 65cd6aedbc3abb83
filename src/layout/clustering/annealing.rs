//! Simulated annealing schedule.
//!
//! Tracks the iteration budget, cools the temperature geometrically and
//! shrinks the edge cutting threshold quadratically as the run progresses.

/// Cutting threshold at progress 0, in units of rest distance.
pub const MAX_CUT_FACTOR: f32 = 10_000.0;
/// Cutting threshold floor at progress 1, in units of rest distance.
pub const MIN_CUT_FACTOR: f32 = 100.0;

/// `t - t / rate`.
#[inline]
pub fn cool_down(temperature: f32, rate: f32) -> f32 {
    temperature - temperature / rate
}

/// `max_cut · (1 - progress)² + min_cut`.
pub fn cutting_threshold(rest_distance: f32, progress: f64) -> f32 {
    let max_cut = MAX_CUT_FACTOR * rest_distance;
    let min_cut = MIN_CUT_FACTOR * rest_distance;
    let remaining = (1.0 - progress) as f32;
    max_cut * remaining * remaining + min_cut
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnealingSchedule {
    temperature: f32,
    cool_down_rate: f32,
    rest_distance: f32,
    cutting_threshold: f32,
    total_iterations: u32,
    max_iterations: u32,
}

impl AnnealingSchedule {
    pub fn new(
        initial_temperature: f32,
        cool_down_rate: f32,
        rest_distance: f32,
        max_iterations: u32,
    ) -> Self {
        Self {
            temperature: initial_temperature,
            cool_down_rate,
            rest_distance,
            cutting_threshold: MAX_CUT_FACTOR * rest_distance,
            total_iterations: 0,
            max_iterations,
        }
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn cutting_threshold(&self) -> f32 {
        self.cutting_threshold
    }

    /// Iterations completed by finished batches.
    pub fn total_iterations(&self) -> u32 {
        self.total_iterations
    }

    /// Fraction of the budget reached at `iteration` of the current batch.
    pub fn progress(&self, iteration: u32) -> f64 {
        if self.max_iterations == 0 {
            return 1.0;
        }
        (iteration as f64 + self.total_iterations as f64) / self.max_iterations as f64
    }

    /// Close out `iteration` of the current batch: cool down and retarget the
    /// cutting threshold. Returns the progress value to report.
    pub fn advance(&mut self, iteration: u32) -> f64 {
        let progress = self.progress(iteration);
        self.temperature = cool_down(self.temperature, self.cool_down_rate);
        self.cutting_threshold = cutting_threshold(self.rest_distance, progress);
        progress
    }

    /// Count a finished batch. Returns true once the budget is exhausted.
    pub fn finish_batch(&mut self, iterations: u32) -> bool {
        self.total_iterations = self.total_iterations.saturating_add(iterations);
        self.total_iterations >= self.max_iterations
    }
}
