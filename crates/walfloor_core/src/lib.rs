//! # walfloor core
//!
//! Retention floor computation for a segmented write-ahead log.
//!
//! The WAL is split into fixed-size segment files. A reclamation driver
//! periodically recycles every segment below a *recycle boundary*. This crate
//! decides how far down that boundary has to move so that segments still
//! required by active retention requirements survive:
//!
//! - a configured number of segments to keep behind the write head
//!   (`keep_segments`)
//! - the minimum position still needed by replication slots
//!
//! This crate provides:
//! - Position and segment number types
//! - Position to segment conversions
//! - The pure floor computation ([`compute_retention_floor`])
//! - A lock-guarded owner of the shared boundary ([`RetentionControl`])
//!
//! ## Example
//!
//! ```rust
//! use walfloor_core::{compute_retention_floor, LogPosition, SegmentNumber, SegmentSize};
//!
//! let size = SegmentSize::new(64 * 1024 * 1024).unwrap();
//! let head = LogPosition::from_parts(4, 64 * 1024 * 1024);
//! let mut boundary = SegmentNumber::new(202);
//!
//! let floor = compute_retention_floor(head, &mut boundary, 194, None, size);
//! assert_eq!(floor, SegmentNumber::new(63));
//! assert_eq!(boundary, floor);
//! ```
//!
//! ## Invariants
//!
//! - The boundary is only ever **lowered**, never raised
//! - Every computed floor is at least [`SegmentNumber::FIRST`]
//! - The computation is pure: no I/O, no allocation, no suspension

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod control;
mod error;
mod retention;
mod segment;
mod stats;
mod types;

pub use config::RetentionConfig;
pub use control::RetentionControl;
pub use error::{CoreError, CoreResult};
pub use retention::{
    compute_retention_floor, compute_retention_floor_detailed, FloorSource, RetentionFloor,
};
pub use segment::{
    segment_number_from_log_id, segment_number_of, segment_offset, segment_start,
    segments_per_log_id, LOG_ID_BYTES,
};
pub use stats::{RetentionStats, RetentionStatsSnapshot};
pub use types::{LogPosition, SegmentNumber, SegmentSize};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
