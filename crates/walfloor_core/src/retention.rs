//! Retention floor computation.
//!
//! Given the current write head and the active retention requirements,
//! lowers the recycle boundary so that no segment still required is
//! recycled.
//!
//! ## Requirements
//!
//! - **keep segments**: keep the last `keep_segments` segments behind the
//!   segment holding the write head. Enabled iff `keep_segments > 0`.
//! - **replication floor**: keep everything from the segment holding the
//!   lowest position any replication slot still needs. Enabled iff present.
//!
//! ## Invariants
//!
//! - Output is never above the input boundary
//! - Output is at least [`SegmentNumber::FIRST`] for any valid input boundary
//! - Calling again with the output as the boundary yields the same output
//! - With every requirement disabled the boundary is returned untouched
//! - No I/O and no logging: callers run this inside a critical section

use crate::segment::segment_number_of;
use crate::types::{LogPosition, SegmentNumber, SegmentSize};

/// Which requirement produced a computed floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloorSource {
    /// No requirement was below the input boundary.
    Unchanged,
    /// The keep-segments window lowered the boundary.
    KeepSegments,
    /// The replication floor lowered the boundary.
    ReplicationFloor,
}

impl FloorSource {
    /// Returns a short lowercase name, used in logs and reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unchanged => "unchanged",
            Self::KeepSegments => "keep_segments",
            Self::ReplicationFloor => "replication_floor",
        }
    }
}

/// Result of a retention floor computation, with its provenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionFloor {
    /// The new recycle boundary.
    pub segment: SegmentNumber,
    /// Which requirement set it.
    pub source: FloorSource,
    /// Whether the keep-segments window reached past the start of the log
    /// and was clamped to [`SegmentNumber::FIRST`].
    pub keep_clamped: bool,
}

/// Lowers `recycle_boundary` to satisfy the active retention requirements
/// and returns the new boundary.
///
/// `keep_segments <= 0` disables the keep-segments requirement and `None`
/// disables the replication floor. The boundary is written back in place.
///
/// # Example
///
/// ```rust
/// use walfloor_core::{compute_retention_floor, LogPosition, SegmentNumber, SegmentSize};
///
/// let size = SegmentSize::new(64 * 1024 * 1024).unwrap();
/// let head = LogPosition::from_parts(3, 64 * 1024 * 1024); // segment 193
/// let mut boundary = SegmentNumber::new(129);
///
/// // Keeping 194 segments reaches past the start of the log.
/// let floor = compute_retention_floor(head, &mut boundary, 194, None, size);
/// assert_eq!(floor, SegmentNumber::FIRST);
/// ```
pub fn compute_retention_floor(
    current_position: LogPosition,
    recycle_boundary: &mut SegmentNumber,
    keep_segments: i64,
    replication_floor: Option<LogPosition>,
    size: SegmentSize,
) -> SegmentNumber {
    compute_retention_floor_detailed(
        current_position,
        recycle_boundary,
        keep_segments,
        replication_floor,
        size,
    )
    .segment
}

/// Same as [`compute_retention_floor`], but also reports which requirement
/// produced the result.
pub fn compute_retention_floor_detailed(
    current_position: LogPosition,
    recycle_boundary: &mut SegmentNumber,
    keep_segments: i64,
    replication_floor: Option<LogPosition>,
    size: SegmentSize,
) -> RetentionFloor {
    let mut floor = RetentionFloor {
        segment: *recycle_boundary,
        source: FloorSource::Unchanged,
        keep_clamped: false,
    };

    if keep_segments <= 0 && replication_floor.is_none() {
        return floor;
    }

    let current_segno = segment_number_of(current_position, size);

    if keep_segments > 0 {
        let keep_floor = match current_segno.checked_back(keep_segments.unsigned_abs()) {
            Some(segno) => segno,
            None => {
                floor.keep_clamped = true;
                SegmentNumber::FIRST
            }
        };
        if keep_floor < floor.segment {
            floor.segment = keep_floor;
            floor.source = FloorSource::KeepSegments;
        }
    }

    if let Some(position) = replication_floor {
        // A slot still inside segment 0 pins the whole log.
        let slot_floor = segment_number_of(position, size).max(SegmentNumber::FIRST);
        if slot_floor < floor.segment {
            floor.segment = slot_floor;
            floor.source = FloorSource::ReplicationFloor;
        }
    }

    *recycle_boundary = floor.segment;
    floor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::{segment_number_from_log_id, segment_start};
    use proptest::prelude::*;

    const MIB: u64 = 1024 * 1024;

    fn mib64() -> SegmentSize {
        SegmentSize::new(64 * MIB).unwrap()
    }

    /// Segment `off` of log id `id` with 64 MiB segments.
    fn seg(id: u32, off: u64) -> SegmentNumber {
        segment_number_from_log_id(id, off, mib64())
    }

    /// Position of the start of segment `seg_in_id` within log id `id`.
    fn pos(id: u32, seg_in_id: u32) -> LogPosition {
        LogPosition::from_parts(id, seg_in_id * (64 * MIB) as u32)
    }

    fn keep(current: LogPosition, boundary: SegmentNumber, keep_segments: i64) -> SegmentNumber {
        let mut boundary = boundary;
        let floor = compute_retention_floor(current, &mut boundary, keep_segments, None, mib64());
        assert_eq!(floor, boundary, "returned floor must match stored boundary");
        floor
    }

    #[test]
    fn boundary_above_keep_window_is_lowered() {
        assert_eq!(keep(pos(4, 1), seg(3, 10), 194), SegmentNumber::new(63));
    }

    #[test]
    fn boundary_below_keep_window_is_untouched() {
        assert_eq!(keep(pos(4, 1), SegmentNumber::new(60), 194), SegmentNumber::new(60));
    }

    #[test]
    fn conservative_boundary_is_untouched() {
        assert_eq!(keep(pos(5, 8), seg(1, 60), 194), seg(1, 60));
    }

    #[test]
    fn keep_window_past_log_start_clamps_to_first() {
        assert_eq!(keep(pos(3, 1), seg(2, 1), 194), SegmentNumber::FIRST);
    }

    #[test]
    fn boundary_lowered_to_exact_keep_floor() {
        assert_eq!(keep(pos(5, 8), seg(2, 8), 194), seg(2, 6));
        assert_eq!(seg(2, 6), SegmentNumber::new(134));
    }

    #[test]
    fn non_positive_keep_is_disabled() {
        let boundary = seg(9, 45);
        assert_eq!(keep(pos(5, 8), boundary, 0), boundary);
        assert_eq!(keep(pos(5, 8), boundary, -1), boundary);
        assert_eq!(keep(pos(5, 8), boundary, i64::MIN), boundary);
    }

    #[test]
    fn keep_equal_to_current_segment_clamps() {
        let mut boundary = SegmentNumber::new(500);
        let floor =
            compute_retention_floor_detailed(pos(3, 1), &mut boundary, 193, None, mib64());
        assert_eq!(floor.segment, SegmentNumber::FIRST);
        assert!(floor.keep_clamped);
        assert_eq!(floor.source, FloorSource::KeepSegments);
    }

    #[test]
    fn replication_floor_alone_lowers_boundary() {
        let mut boundary = SegmentNumber::new(300);
        let slot = segment_start(SegmentNumber::new(120), mib64());
        let floor =
            compute_retention_floor_detailed(pos(5, 8), &mut boundary, 0, Some(slot), mib64());

        assert_eq!(floor.segment, SegmentNumber::new(120));
        assert_eq!(floor.source, FloorSource::ReplicationFloor);
        assert!(!floor.keep_clamped);
        assert_eq!(boundary, SegmentNumber::new(120));
    }

    #[test]
    fn replication_floor_above_boundary_is_ignored() {
        let mut boundary = SegmentNumber::new(100);
        let slot = segment_start(SegmentNumber::new(120), mib64());
        let floor =
            compute_retention_floor_detailed(pos(5, 8), &mut boundary, 0, Some(slot), mib64());

        assert_eq!(floor.segment, SegmentNumber::new(100));
        assert_eq!(floor.source, FloorSource::Unchanged);
    }

    #[test]
    fn replication_floor_in_segment_zero_keeps_everything() {
        let mut boundary = SegmentNumber::new(300);
        let floor = compute_retention_floor(
            pos(5, 8),
            &mut boundary,
            0,
            Some(LogPosition::new(42)),
            mib64(),
        );
        assert_eq!(floor, SegmentNumber::FIRST);
    }

    #[test]
    fn both_requirements_take_the_lower_floor() {
        // keep floor = 328 - 194 = 134
        let slot_low = segment_start(SegmentNumber::new(90), mib64());
        let mut boundary = SegmentNumber::new(300);
        let floor =
            compute_retention_floor_detailed(pos(5, 8), &mut boundary, 194, Some(slot_low), mib64());
        assert_eq!(floor.segment, SegmentNumber::new(90));
        assert_eq!(floor.source, FloorSource::ReplicationFloor);

        let slot_high = segment_start(SegmentNumber::new(200), mib64());
        let mut boundary = SegmentNumber::new(300);
        let floor = compute_retention_floor_detailed(
            pos(5, 8),
            &mut boundary,
            194,
            Some(slot_high),
            mib64(),
        );
        assert_eq!(floor.segment, SegmentNumber::new(134));
        assert_eq!(floor.source, FloorSource::KeepSegments);
    }

    #[test]
    fn source_names() {
        assert_eq!(FloorSource::Unchanged.as_str(), "unchanged");
        assert_eq!(FloorSource::KeepSegments.as_str(), "keep_segments");
        assert_eq!(FloorSource::ReplicationFloor.as_str(), "replication_floor");
    }

    fn segment_size_strategy() -> impl Strategy<Value = SegmentSize> {
        (20u32..=30).prop_map(|shift| SegmentSize::new(1u64 << shift).unwrap())
    }

    fn boundary_strategy() -> impl Strategy<Value = SegmentNumber> {
        (1u64..=u64::MAX >> 20).prop_map(SegmentNumber::new)
    }

    fn replication_strategy() -> impl Strategy<Value = Option<LogPosition>> {
        proptest::option::of(any::<u64>().prop_map(LogPosition::new))
    }

    proptest! {
        #[test]
        fn disabled_requirements_are_identity(
            boundary in boundary_strategy(),
            current in any::<u64>(),
            keep_segments in i64::MIN..=0,
            size in segment_size_strategy(),
        ) {
            let mut b = boundary;
            let floor = compute_retention_floor(LogPosition::new(current), &mut b, keep_segments, None, size);
            prop_assert_eq!(floor, boundary);
            prop_assert_eq!(b, boundary);
        }

        #[test]
        fn never_raises_and_never_below_first(
            boundary in boundary_strategy(),
            current in any::<u64>(),
            keep_segments in any::<i64>(),
            replication in replication_strategy(),
            size in segment_size_strategy(),
        ) {
            let mut b = boundary;
            let floor = compute_retention_floor(LogPosition::new(current), &mut b, keep_segments, replication, size);
            prop_assert!(floor <= boundary);
            prop_assert!(floor >= SegmentNumber::FIRST);
            prop_assert_eq!(floor, b);
        }

        #[test]
        fn second_call_is_idempotent(
            boundary in boundary_strategy(),
            current in any::<u64>(),
            keep_segments in any::<i64>(),
            replication in replication_strategy(),
            size in segment_size_strategy(),
        ) {
            let current = LogPosition::new(current);
            let mut b = boundary;
            let first = compute_retention_floor(current, &mut b, keep_segments, replication, size);
            let second = compute_retention_floor(current, &mut b, keep_segments, replication, size);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn keep_window_past_start_contributes_first(
            current in any::<u64>(),
            extra in 0i64..1_000,
            size in segment_size_strategy(),
        ) {
            let current = LogPosition::new(current);
            let current_segno = segment_number_of(current, size).as_u64();
            let keep_segments = i64::try_from(current_segno).unwrap_or(i64::MAX).saturating_add(extra).max(1);
            let mut b = SegmentNumber::new(u64::MAX);
            let floor = compute_retention_floor_detailed(current, &mut b, keep_segments, None, size);
            prop_assert_eq!(floor.segment, SegmentNumber::FIRST);
            prop_assert!(floor.keep_clamped);
        }
    }
}
