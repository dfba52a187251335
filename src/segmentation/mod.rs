// Lap segmentation: label samples, split them into segments and reduce the
// segments to per-label totals

pub mod aggregator;
pub mod labeler;
pub mod segmenter;

pub use aggregator::{LabelTotals, LapAggregate, aggregate_lap};
pub use labeler::{LabeledSample, SegmentLabeler};
pub use segmenter::{LapPoint, Segment, segment_lap};

use crate::CorneringError;
use crate::telemetry::TelemetrySample;

/// Segments and totals of one lap
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentedLap {
    pub segments: Vec<Segment>,
    pub aggregate: LapAggregate,
}

/// Label, segment and aggregate a lap recorded on `track_key`
pub fn process_lap(
    labeler: &SegmentLabeler<'_>,
    track_key: &str,
    samples: &[TelemetrySample],
) -> Result<SegmentedLap, CorneringError> {
    let labeled = labeler.label_lap(track_key, samples)?;
    let segments = segment_lap(&labeled)?;
    let aggregate = aggregate_lap(&segments);
    Ok(SegmentedLap {
        segments,
        aggregate,
    })
}
