//! CLI command implementations.

pub mod floor;
pub mod segment;
