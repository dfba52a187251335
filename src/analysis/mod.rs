// Cross-team analysis of aggregated laps: performance indices, lap time
// projection and track profiles

pub mod data_quality;
pub mod performance;
pub mod pipeline;
pub mod profile;
pub mod projection;
pub mod records;

pub use data_quality::{DataQualityPolicy, ExclusionRule};
pub use performance::{IndexMode, TeamIndexRow, TeamPerformanceTable};
pub use pipeline::{BatchReport, LapFailure, season_profiles, season_records, session_records};
pub use profile::{CornerProfile, TrackClusterer, TrackProfileTable};
pub use projection::{LapTimeProjector, ProjectedLap, Projection};
pub use records::{CornerRecord, LapRecord, SessionRange, corner_records, lap_records};
