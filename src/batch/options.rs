//! Batch runner configuration.

use std::num::NonZeroUsize;
use std::thread;

/// Options for a batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
    /// Number of worker threads (at least 1)
    pub workers: usize,
}

impl BatchOptions {
    /// Create new batch options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the worker count; zero is raised to one.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            workers: default_workers(),
        }
    }
}

/// One worker per available core, minus one for the coordinating thread.
pub fn default_workers() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
        .saturating_sub(1)
        .max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_workers_at_least_one() {
        assert!(default_workers() >= 1);
        assert!(BatchOptions::default().workers >= 1);
    }

    #[test]
    fn test_zero_workers_raised() {
        assert_eq!(BatchOptions::new().with_workers(0).workers, 1);
        assert_eq!(BatchOptions::new().with_workers(4).workers, 4);
    }
}
