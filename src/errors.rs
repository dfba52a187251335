// Error types for cornering

use crate::track_metadata::SegmentLabel;
use snafu::Snafu;
use std::io;

#[derive(Debug, Snafu)]
pub enum CorneringError {
    // Segmentation errors
    #[snafu(display("No boundary table for session: {key}"))]
    UnknownTrackKey { key: String },
    #[snafu(display("Lap has no telemetry samples"))]
    EmptyLap,

    // Aggregation and projection errors
    #[snafu(display("Cannot project lap time for {team}: ratio index for {label} is zero"))]
    UndefinedProjection { team: String, label: SegmentLabel },
    #[snafu(display("No {label} data for {scope}"))]
    MissingAggregateLabel { label: SegmentLabel, scope: String },

    // Config management errors
    #[snafu(display("Could not find application config directory"))]
    NoConfigDir,
    #[snafu(display("Error reading or writing config file"))]
    ConfigIOError { source: io::Error },
    #[snafu(display("Error parsing config file"))]
    ConfigSerializeError { source: serde_json::Error },

    // Boundary table errors
    #[snafu(display("Error loading boundary tables from {path}"))]
    BoundaryTableIOError { path: String, source: io::Error },
    #[snafu(display("Invalid boundary table file {path}"))]
    BoundaryTableParseError {
        path: String,
        source: serde_json::Error,
    },

    // Telemetry loading errors
    #[snafu(display("Invalid session file: {path} - {reason}"))]
    InvalidSessionFile { path: String, reason: String },
    #[snafu(display("Error loading session file"))]
    SessionLoaderError { source: io::Error },

    // Persistence errors
    #[snafu(display("Error writing {what}"))]
    WriterError { what: String, source: io::Error },
    #[snafu(display("Error reading {what}"))]
    ReaderError { what: String, source: io::Error },
    #[snafu(display("Error serializing {what}"))]
    SerializeError {
        what: String,
        source: serde_json::Error,
    },

    // User input validation errors
    #[snafu(display("Invalid user input: {field} - {reason}"))]
    InvalidUserInput { field: String, reason: String },
}
