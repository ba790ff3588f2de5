//! Shared recycle boundary.
//!
//! The checkpointer and the WAL senders of a running engine all update the
//! recycle boundary. [`RetentionControl`] owns it together with the latest
//! replication floor published by the slot manager, and serializes every
//! read-compute-write behind one short lock.
//!
//! The lock is never held across I/O or logging; only the pure floor
//! computation runs inside it.

use crate::config::RetentionConfig;
use crate::retention::{compute_retention_floor_detailed, FloorSource, RetentionFloor};
use crate::stats::RetentionStats;
use crate::types::{LogPosition, SegmentNumber};
use parking_lot::Mutex;
use tracing::{debug, trace};

#[derive(Debug)]
struct ControlState {
    recycle_boundary: SegmentNumber,
    replication_floor: Option<LogPosition>,
}

/// Owner of the shared recycle boundary.
///
/// Share it between threads with `Arc<RetentionControl>`.
///
/// ## Example
///
/// ```rust
/// use walfloor_core::{LogPosition, RetentionConfig, RetentionControl, SegmentNumber};
///
/// let config = RetentionConfig::with_segment_bytes(64 * 1024 * 1024)
///     .unwrap()
///     .keep_segments(194);
/// let control = RetentionControl::new(SegmentNumber::new(202));
///
/// let head = LogPosition::from_parts(4, 64 * 1024 * 1024);
/// assert_eq!(control.keep_log_segments(head, &config), SegmentNumber::new(63));
/// assert_eq!(control.recycle_boundary(), SegmentNumber::new(63));
/// ```
#[derive(Debug)]
pub struct RetentionControl {
    state: Mutex<ControlState>,
    stats: RetentionStats,
}

impl RetentionControl {
    /// Creates a control block with the given starting boundary and no
    /// replication floor.
    pub fn new(initial_boundary: SegmentNumber) -> Self {
        Self {
            state: Mutex::new(ControlState {
                recycle_boundary: initial_boundary,
                replication_floor: None,
            }),
            stats: RetentionStats::new(),
        }
    }

    /// Returns the current recycle boundary.
    pub fn recycle_boundary(&self) -> SegmentNumber {
        self.state.lock().recycle_boundary
    }

    /// Replaces the recycle boundary.
    ///
    /// This is the only way to raise the boundary. The reclamation driver
    /// calls it once a checkpoint has established a new starting point,
    /// before applying retention again.
    pub fn set_recycle_boundary(&self, segno: SegmentNumber) {
        let previous = {
            let mut state = self.state.lock();
            std::mem::replace(&mut state.recycle_boundary, segno)
        };
        debug!(
            from = previous.as_u64(),
            to = segno.as_u64(),
            "recycle boundary reset"
        );
    }

    /// Returns the replication floor last published by the slot manager.
    pub fn replication_floor(&self) -> Option<LogPosition> {
        self.state.lock().replication_floor
    }

    /// Publishes the minimum position any replication slot still needs.
    ///
    /// `None` means no slot currently holds back the log.
    pub fn set_replication_floor(&self, floor: Option<LogPosition>) {
        self.state.lock().replication_floor = floor;
        match floor {
            Some(position) => debug!(floor = %position, "replication floor updated"),
            None => debug!("replication floor cleared"),
        }
    }

    /// Applies retention to the shared boundary using the stored
    /// replication floor, and returns the new boundary.
    pub fn keep_log_segments(
        &self,
        current_position: LogPosition,
        config: &RetentionConfig,
    ) -> SegmentNumber {
        self.apply(current_position, None, config).segment
    }

    /// Applies retention with an explicitly supplied replication floor
    /// snapshot instead of the stored one.
    pub fn keep_log_segments_with(
        &self,
        current_position: LogPosition,
        replication_floor: Option<LogPosition>,
        config: &RetentionConfig,
    ) -> SegmentNumber {
        self.apply(current_position, Some(replication_floor), config)
            .segment
    }

    /// Returns the statistics for this control block.
    pub fn stats(&self) -> &RetentionStats {
        &self.stats
    }

    fn apply(
        &self,
        current_position: LogPosition,
        replication_override: Option<Option<LogPosition>>,
        config: &RetentionConfig,
    ) -> RetentionFloor {
        let (previous, floor) = {
            let mut state = self.state.lock();
            let replication_floor = replication_override.unwrap_or(state.replication_floor);
            let previous = state.recycle_boundary;
            let floor = compute_retention_floor_detailed(
                current_position,
                &mut state.recycle_boundary,
                config.keep_segments,
                replication_floor,
                config.segment_size,
            );
            (previous, floor)
        };

        let lowered = floor.segment < previous;
        self.stats.record_computation(lowered, floor.keep_clamped);

        if lowered {
            debug!(
                from = previous.as_u64(),
                to = floor.segment.as_u64(),
                current = %current_position,
                source = floor.source.as_str(),
                "lowered recycle boundary"
            );
        } else {
            debug_assert_eq!(floor.source, FloorSource::Unchanged);
            trace!(
                boundary = previous.as_u64(),
                current = %current_position,
                "recycle boundary already satisfies retention"
            );
        }
        if floor.keep_clamped {
            trace!(
                keep_segments = config.keep_segments,
                current = %current_position,
                "keep window reaches the start of the log"
            );
        }

        floor
    }
}

impl Default for RetentionControl {
    fn default() -> Self {
        Self::new(SegmentNumber::FIRST)
    }
}
