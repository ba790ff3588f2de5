//! Retention statistics.
//!
//! Counters are relaxed atomics, readable while computations are running.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters describing retention floor activity.
#[derive(Debug, Default)]
pub struct RetentionStats {
    /// Total number of floor computations.
    computations: AtomicU64,
    /// Computations that lowered the boundary.
    boundary_lowered: AtomicU64,
    /// Computations where the keep window was clamped at the log start.
    keep_clamped: AtomicU64,
}

impl RetentionStats {
    /// Creates a new stats instance.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_computation(&self, lowered: bool, keep_clamped: bool) {
        self.computations.fetch_add(1, Ordering::Relaxed);
        if lowered {
            self.boundary_lowered.fetch_add(1, Ordering::Relaxed);
        }
        if keep_clamped {
            self.keep_clamped.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Returns the total number of floor computations.
    pub fn computations(&self) -> u64 {
        self.computations.load(Ordering::Relaxed)
    }

    /// Returns how many computations lowered the boundary.
    pub fn boundary_lowered(&self) -> u64 {
        self.boundary_lowered.load(Ordering::Relaxed)
    }

    /// Returns how many computations hit the start-of-log clamp.
    ///
    /// A steadily rising count means the keep window is larger than the
    /// log written so far.
    pub fn keep_clamped(&self) -> u64 {
        self.keep_clamped.load(Ordering::Relaxed)
    }

    /// Returns a snapshot of all stats.
    pub fn snapshot(&self) -> RetentionStatsSnapshot {
        RetentionStatsSnapshot {
            computations: self.computations(),
            boundary_lowered: self.boundary_lowered(),
            keep_clamped: self.keep_clamped(),
        }
    }
}

/// A point-in-time snapshot of [`RetentionStats`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RetentionStatsSnapshot {
    /// Total number of floor computations.
    pub computations: u64,
    /// Computations that lowered the boundary.
    pub boundary_lowered: u64,
    /// Computations where the keep window was clamped at the log start.
    pub keep_clamped: u64,
}
