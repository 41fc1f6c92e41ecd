//! Iteration caps and deadlines for graph search.

use std::time::{Duration, Instant};

use super::SearchError;

/// Bounds on how much work one search may do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    /// Maximum number of node expansions.
    pub max_iterations: usize,

    /// Wall-clock instant after which the search gives up.
    pub deadline: Option<Instant>,

    /// The deadline is checked once every this many expansions.
    pub check_every: usize,
}

impl SearchLimits {
    /// Default expansion cap for point-to-point searches.
    pub const POINT_TO_POINT_ITERATIONS: usize = 10_000;

    /// Default expansion cap for reachability sweeps.
    pub const REACHABILITY_ITERATIONS: usize = 100_000;

    /// Default deadline check interval.
    pub const DEFAULT_CHECK_EVERY: usize = 256;

    pub fn new(max_iterations: usize) -> Self {
        Self {
            max_iterations,
            deadline: None,
            check_every: Self::DEFAULT_CHECK_EVERY,
        }
    }

    pub fn point_to_point() -> Self {
        Self::new(Self::POINT_TO_POINT_ITERATIONS)
    }

    pub fn reachability() -> Self {
        Self::new(Self::REACHABILITY_ITERATIONS)
    }

    /// Stop at the given instant.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Stop `timeout` from now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Set how often the deadline is polled.
    pub fn with_check_every(mut self, n: usize) -> Self {
        self.check_every = n.max(1);
        self
    }

    /// Called before expansion number `iteration` (zero-based).
    pub(crate) fn check(&self, iteration: usize) -> Result<(), SearchError> {
        if iteration >= self.max_iterations {
            return Err(SearchError::IterationCap(self.max_iterations));
        }
        if let Some(deadline) = self.deadline {
            if iteration % self.check_every.max(1) == 0 && Instant::now() >= deadline {
                return Err(SearchError::DeadlineExceeded);
            }
        }
        Ok(())
    }
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self::point_to_point()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limits() {
        let limits = SearchLimits::default();
        assert_eq!(limits.max_iterations, 10_000);
        assert_eq!(limits.deadline, None);
        assert_eq!(limits.check_every, 256);
        assert_eq!(SearchLimits::reachability().max_iterations, 100_000);
    }

    #[test]
    fn cap_is_exclusive() {
        let limits = SearchLimits::new(3);
        assert!(limits.check(0).is_ok());
        assert!(limits.check(2).is_ok());
        assert_eq!(limits.check(3), Err(SearchError::IterationCap(3)));
    }

    #[test]
    fn past_deadline_fails_on_check_boundary() {
        let past = Instant::now() - Duration::from_millis(1);
        let limits = SearchLimits::new(1000)
            .with_deadline(past)
            .with_check_every(4);
        assert_eq!(limits.check(0), Err(SearchError::DeadlineExceeded));
        assert!(limits.check(1).is_ok());
        assert_eq!(limits.check(4), Err(SearchError::DeadlineExceeded));
    }

    #[test]
    fn future_deadline_passes() {
        let limits = SearchLimits::new(1000).with_timeout(Duration::from_secs(60));
        assert!(limits.check(0).is_ok());
        assert!(limits.check(512).is_ok());
    }
}
