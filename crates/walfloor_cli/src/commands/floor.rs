//! Floor command implementation.

use serde::Serialize;
use tracing::info;
use walfloor_core::{
    compute_retention_floor_detailed, segment_number_of, LogPosition, RetentionConfig,
    SegmentNumber,
};

/// Result of applying retention to a boundary.
#[derive(Debug, Serialize)]
pub struct FloorReport {
    /// Current write position.
    pub position: String,
    /// Segment holding the write position.
    pub current_segment: u64,
    /// Boundary before retention was applied.
    pub boundary_before: u64,
    /// Boundary after retention was applied.
    pub boundary_after: u64,
    /// Requirement that set the new boundary.
    pub source: &'static str,
    /// Whether the keep window was clamped at the start of the log.
    pub keep_clamped: bool,
}

/// Runs the floor command.
pub fn run(
    position: LogPosition,
    boundary: u64,
    keep_segments: i64,
    replication_floor: Option<LogPosition>,
    segment_bytes: u64,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = RetentionConfig::with_segment_bytes(segment_bytes)?.keep_segments(keep_segments);
    let report = build_report(position, boundary, replication_floor, &config);

    info!(
        before = report.boundary_before,
        after = report.boundary_after,
        source = report.source,
        "computed retention floor"
    );

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            print_text_output(&report);
        }
    }

    Ok(())
}

fn build_report(
    position: LogPosition,
    boundary: u64,
    replication_floor: Option<LogPosition>,
    config: &RetentionConfig,
) -> FloorReport {
    let mut segno = SegmentNumber::new(boundary);
    let floor = compute_retention_floor_detailed(
        position,
        &mut segno,
        config.keep_segments,
        replication_floor,
        config.segment_size,
    );

    FloorReport {
        position: position.to_string(),
        current_segment: segment_number_of(position, config.segment_size).as_u64(),
        boundary_before: boundary,
        boundary_after: floor.segment.as_u64(),
        source: floor.source.as_str(),
        keep_clamped: floor.keep_clamped,
    }
}

fn print_text_output(report: &FloorReport) {
    println!("Retention Floor");
    println!("===============");
    println!("Position:          {}", report.position);
    println!("Current segment:   {}", report.current_segment);
    println!("Boundary before:   {}", report.boundary_before);
    println!("Boundary after:    {}", report.boundary_after);
    println!("Set by:            {}", report.source);
    if report.keep_clamped {
        println!("Keep window reaches the start of the log");
    }
    println!();
    println!("Segments below {} may be recycled", report.boundary_after);
}
