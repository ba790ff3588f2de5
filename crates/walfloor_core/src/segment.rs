//! Conversions between log positions and segment numbers.
//!
//! The log address space is also grouped into 4 GiB "log ids" (the high
//! half of a [`LogPosition`]). Segment numbers run continuously across log
//! ids, so segment `n` of log id `i` is `i * segments_per_log_id + n`.

use crate::types::{LogPosition, SegmentNumber, SegmentSize};

/// Bytes covered by one log id.
pub const LOG_ID_BYTES: u64 = 1 << 32;

/// Returns the segment containing `position`.
///
/// Truncating division: the first byte of a segment and its last byte map
/// to the same segment number.
#[must_use]
pub const fn segment_number_of(position: LogPosition, size: SegmentSize) -> SegmentNumber {
    SegmentNumber::new(position.as_u64() >> size.shift())
}

/// Returns how many segments fit in one log id.
#[must_use]
pub const fn segments_per_log_id(size: SegmentSize) -> u64 {
    LOG_ID_BYTES >> size.shift()
}

/// Returns the segment number of the `offset_in_id`-th segment of `log_id`.
#[must_use]
pub const fn segment_number_from_log_id(
    log_id: u32,
    offset_in_id: u64,
    size: SegmentSize,
) -> SegmentNumber {
    SegmentNumber::new(log_id as u64 * segments_per_log_id(size) + offset_in_id)
}

/// Returns the position of the first byte of `segno`.
#[must_use]
pub const fn segment_start(segno: SegmentNumber, size: SegmentSize) -> LogPosition {
    LogPosition::new(segno.as_u64() << size.shift())
}

/// Returns the byte offset of `position` within its segment.
#[must_use]
pub const fn segment_offset(position: LogPosition, size: SegmentSize) -> u64 {
    position.as_u64() & (size.bytes() - 1)
}
