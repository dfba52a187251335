// Library interface for cornering
// This allows integration tests to access internal modules

pub mod analysis;
pub mod config;
pub mod errors;
pub mod persistence;
pub mod segmentation;
pub mod telemetry;
pub mod track_metadata;

// Re-export commonly used types
pub use analysis::{CornerProfile, CornerRecord, LapRecord, TeamPerformanceTable};
pub use config::AnalysisConfig;
pub use errors::CorneringError;
pub use segmentation::{LapAggregate, Segment, SegmentLabeler, process_lap};
pub use telemetry::{Session, SessionInfo, TelemetryOutput, TelemetrySample};
pub use track_metadata::{BoundaryTables, SegmentLabel};
