//! Core type definitions for walfloor.

use crate::error::{CoreError, CoreResult};
use std::fmt;
use std::str::FromStr;

/// Byte offset into the log address space.
///
/// Positions grow monotonically over the lifetime of the log and are never
/// reused. An absent position is `Option<LogPosition>`, never a sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LogPosition(pub u64);

impl LogPosition {
    /// Creates a position from a raw byte offset.
    #[must_use]
    pub const fn new(offset: u64) -> Self {
        Self(offset)
    }

    /// Creates a position from its high and low 32-bit halves.
    #[must_use]
    pub const fn from_parts(hi: u32, lo: u32) -> Self {
        Self(((hi as u64) << 32) | lo as u64)
    }

    /// Returns the raw byte offset.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Returns the high 32 bits (the log id).
    #[must_use]
    pub const fn hi(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Returns the low 32 bits (the offset within the log id).
    #[must_use]
    pub const fn lo(self) -> u32 {
        self.0 as u32
    }
}

impl fmt::Display for LogPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:X}/{:X}", self.hi(), self.lo())
    }
}

impl FromStr for LogPosition {
    type Err = CoreError;

    /// Parses the `HI/LO` hexadecimal form, e.g. `4/4000000`.
    fn from_str(s: &str) -> CoreResult<Self> {
        let (hi, lo) = s
            .split_once('/')
            .ok_or_else(|| CoreError::invalid_position(s))?;
        let hi = parse_half(hi).ok_or_else(|| CoreError::invalid_position(s))?;
        let lo = parse_half(lo).ok_or_else(|| CoreError::invalid_position(s))?;
        Ok(Self::from_parts(hi, lo))
    }
}

fn parse_half(half: &str) -> Option<u32> {
    if half.is_empty() || half.len() > 8 || !half.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(half, 16).ok()
}

/// Sequential identifier of a WAL segment.
///
/// Segment numbers are derived from positions by floor division. Valid
/// segments start at [`SegmentNumber::FIRST`]; `0` never names a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SegmentNumber(pub u64);

impl SegmentNumber {
    /// The lowest valid segment number.
    pub const FIRST: Self = Self(1);

    /// Creates a segment number.
    #[must_use]
    pub const fn new(segno: u64) -> Self {
        Self(segno)
    }

    /// Returns the raw segment number.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Returns true if this names a real segment (`>= 1`).
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 >= Self::FIRST.0
    }

    /// Moves `count` segments back, never going below [`SegmentNumber::FIRST`].
    ///
    /// Returns `None` when the clamp was applied, so callers can tell a real
    /// floor from "keep everything since the start of the log".
    #[must_use]
    pub const fn checked_back(self, count: u64) -> Option<Self> {
        if count >= self.0 {
            None
        } else {
            Some(Self(self.0 - count))
        }
    }
}

impl fmt::Display for SegmentNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seg:{}", self.0)
    }
}

/// Size of one WAL segment in bytes.
///
/// Always a power of two between [`SegmentSize::MIN`] and [`SegmentSize::MAX`].
/// Fixed for the lifetime of the segments computed from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SegmentSize(u64);

impl SegmentSize {
    /// Smallest accepted segment size (1 MiB).
    pub const MIN: u64 = 1024 * 1024;

    /// Largest accepted segment size (1 GiB).
    pub const MAX: u64 = 1024 * 1024 * 1024;

    /// Default segment size (16 MiB).
    pub const DEFAULT: Self = Self(16 * 1024 * 1024);

    /// Validates and creates a segment size.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidSegmentSize`] if `bytes` is zero, not a
    /// power of two, or outside `[MIN, MAX]`.
    pub fn new(bytes: u64) -> CoreResult<Self> {
        if bytes == 0 {
            return Err(CoreError::invalid_segment_size(bytes, "must be positive"));
        }
        if !bytes.is_power_of_two() {
            return Err(CoreError::invalid_segment_size(
                bytes,
                "must be a power of two",
            ));
        }
        if !(Self::MIN..=Self::MAX).contains(&bytes) {
            return Err(CoreError::invalid_segment_size(
                bytes,
                "must be between 1 MiB and 1 GiB",
            ));
        }
        Ok(Self(bytes))
    }

    /// Returns the size in bytes.
    #[must_use]
    pub const fn bytes(self) -> u64 {
        self.0
    }

    /// Returns `log2(bytes)`.
    #[must_use]
    pub const fn shift(self) -> u32 {
        self.0.trailing_zeros()
    }
}

impl Default for SegmentSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}
