//! Wall-clock budget of a run.

use std::time::{Duration, Instant, TryFromFloatSecsError};

/// Safety margin kept free before the budget runs out, so a driver can
/// still write its final state.
pub const DEFAULT_MARGIN: Duration = Duration::from_secs(600);

/// Elapsed time since initialisation and an optional budget.
#[derive(Clone, Copy, Debug)]
pub struct WallClock {
    start: Instant,
    limit: Option<Duration>,
    margin: Duration,
}

impl WallClock {
    /// Start a clock with no budget.
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
            limit: None,
            margin: DEFAULT_MARGIN,
        }
    }

    /// Set the budget.
    pub fn with_limit(mut self, limit: Duration) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Budget given in hours, as in input files. Non-positive values mean
    /// no budget; values a `Duration` cannot hold are rejected.
    pub fn with_limit_hours(self, hours: f64) -> Result<Self, TryFromFloatSecsError> {
        if hours <= 0.0 {
            return Ok(self);
        }
        Duration::try_from_secs_f64(hours * 3600.0).map(|limit| self.with_limit(limit))
    }

    /// Replace the safety margin.
    pub fn with_margin(mut self, margin: Duration) -> Self {
        self.margin = margin;
        self
    }

    /// Configured budget, if any.
    pub fn limit(&self) -> Option<Duration> {
        self.limit
    }

    /// Time since [`WallClock::start`].
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Whether less than the margin is left of the budget, judged at
    /// `elapsed`. Always false without a budget.
    pub fn at_limit_after(&self, elapsed: Duration) -> bool {
        match self.limit {
            Some(limit) => elapsed + self.margin >= limit,
            None => false,
        }
    }

    /// Local (non-collective) limit check.
    pub fn at_limit(&self) -> bool {
        self.at_limit_after(self.elapsed())
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::start()
    }
}
