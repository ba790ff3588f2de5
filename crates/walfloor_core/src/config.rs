//! Retention configuration.

use crate::error::CoreResult;
use crate::types::SegmentSize;

/// Configuration for retention floor computation.
///
/// Values arrive already typed; reading them from files or flags is the
/// caller's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionConfig {
    /// Size of one WAL segment.
    pub segment_size: SegmentSize,

    /// Number of segments to keep behind the write head (`<= 0` = disabled).
    pub keep_segments: i64,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            segment_size: SegmentSize::DEFAULT, // 16 MB
            keep_segments: 0,                   // disabled
        }
    }
}

impl RetentionConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration from a raw segment size in bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if `bytes` is not a valid segment size.
    pub fn with_segment_bytes(bytes: u64) -> CoreResult<Self> {
        Ok(Self::default().segment_size(SegmentSize::new(bytes)?))
    }

    /// Sets the segment size.
    #[must_use]
    pub const fn segment_size(mut self, size: SegmentSize) -> Self {
        self.segment_size = size;
        self
    }

    /// Sets the number of segments to keep.
    #[must_use]
    pub const fn keep_segments(mut self, count: i64) -> Self {
        self.keep_segments = count;
        self
    }

    /// Returns true if the keep-segments requirement is active.
    #[must_use]
    pub const fn keep_enabled(&self) -> bool {
        self.keep_segments > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = RetentionConfig::default();
        assert_eq!(config.segment_size, SegmentSize::DEFAULT);
        assert_eq!(config.keep_segments, 0);
        assert!(!config.keep_enabled());
    }

    #[test]
    fn builder_pattern() {
        let config = RetentionConfig::with_segment_bytes(64 * 1024 * 1024)
            .unwrap()
            .keep_segments(194);

        assert_eq!(config.segment_size.bytes(), 64 * 1024 * 1024);
        assert_eq!(config.keep_segments, 194);
        assert!(config.keep_enabled());
    }

    #[test]
    fn negative_keep_is_disabled() {
        assert!(!RetentionConfig::new().keep_segments(-1).keep_enabled());
    }

    #[test]
    fn rejects_bad_segment_bytes() {
        assert!(RetentionConfig::with_segment_bytes(0).is_err());
        assert!(RetentionConfig::with_segment_bytes(100).is_err());
    }
}
