// Track metadata management module
// Provides the per-session boundary tables used to label telemetry samples

pub mod storage;
pub mod types;

// Re-export commonly used types
pub use storage::{bundled_boundary_tables, load_boundary_tables, load_or_bundled};
pub use types::{BoundaryInterval, BoundaryTable, BoundaryTables, SegmentLabel};
