//! Segment command implementation.

use serde::Serialize;
use walfloor_core::{
    segment_number_of, segment_offset, segment_start, segments_per_log_id, LogPosition,
    SegmentSize,
};

/// Where a log position sits in the segment layout.
#[derive(Debug, Serialize)]
pub struct SegmentReport {
    /// The position inspected.
    pub position: String,
    /// Segment size in bytes.
    pub segment_size: u64,
    /// Segment number holding the position.
    pub segment: u64,
    /// Log id (high half of the position).
    pub log_id: u32,
    /// Segment index within the log id.
    pub segment_in_log_id: u64,
    /// Byte offset within the segment.
    pub offset_in_segment: u64,
    /// First position of the segment.
    pub segment_start: String,
}

/// Runs the segment command.
pub fn run(
    position: LogPosition,
    segment_bytes: u64,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let size = SegmentSize::new(segment_bytes)?;
    let report = build_report(position, size);

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            println!("Position:           {}", report.position);
            println!("Segment size:       {} bytes", report.segment_size);
            println!("Segment:            {}", report.segment);
            println!(
                "Log id / index:     {} / {}",
                report.log_id, report.segment_in_log_id
            );
            println!("Offset in segment:  {}", report.offset_in_segment);
            println!("Segment start:      {}", report.segment_start);
        }
    }

    Ok(())
}

fn build_report(position: LogPosition, size: SegmentSize) -> SegmentReport {
    let segno = segment_number_of(position, size);
    SegmentReport {
        position: position.to_string(),
        segment_size: size.bytes(),
        segment: segno.as_u64(),
        log_id: position.hi(),
        segment_in_log_id: segno.as_u64() % segments_per_log_id(size),
        offset_in_segment: segment_offset(position, size),
        segment_start: segment_start(segno, size).to_string(),
    }
}
