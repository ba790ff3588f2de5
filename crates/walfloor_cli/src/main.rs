//! walfloor CLI
//!
//! Command-line tools for working out WAL retention floors by hand.
//!
//! # Commands
//!
//! - `floor` - Apply retention requirements to a recycle boundary
//! - `segment` - Show which segment a log position falls in

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use walfloor_core::{LogPosition, SegmentSize};

/// Default segment size accepted by `--segment-size` (16 MiB).
const DEFAULT_SEGMENT_BYTES: u64 = SegmentSize::DEFAULT.bytes();

/// WAL retention floor tools.
#[derive(Parser)]
#[command(name = "walfloor")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply retention requirements to a recycle boundary
    Floor {
        /// Current write position (HI/LO hex, e.g. 4/4000000)
        #[arg(short, long)]
        position: LogPosition,

        /// Current recycle boundary (segment number)
        #[arg(short, long)]
        boundary: u64,

        /// Segments to keep behind the write head (<= 0 disables)
        #[arg(short, long, default_value = "0", allow_negative_numbers = true)]
        keep_segments: i64,

        /// Lowest position still needed by replication slots
        #[arg(short, long)]
        replication_floor: Option<LogPosition>,

        /// Segment size in bytes
        #[arg(short, long, default_value_t = DEFAULT_SEGMENT_BYTES)]
        segment_size: u64,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show which segment a log position falls in
    Segment {
        /// Log position (HI/LO hex, e.g. 4/4000000)
        #[arg(short, long)]
        position: LogPosition,

        /// Segment size in bytes
        #[arg(short, long, default_value_t = DEFAULT_SEGMENT_BYTES)]
        segment_size: u64,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Floor {
            position,
            boundary,
            keep_segments,
            replication_floor,
            segment_size,
            format,
        } => {
            commands::floor::run(
                position,
                boundary,
                keep_segments,
                replication_floor,
                segment_size,
                &format,
            )?;
        }
        Commands::Segment {
            position,
            segment_size,
            format,
        } => {
            commands::segment::run(position, segment_size, &format)?;
        }
        Commands::Version => {
            println!("walfloor CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("walfloor core v{}", walfloor_core::VERSION);
        }
    }

    Ok(())
}
