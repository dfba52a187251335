use crate::CorneringError;
use crate::telemetry::TelemetrySample;
use crate::track_metadata::{BoundaryTable, BoundaryTables, SegmentLabel};

/// A telemetry sample tagged with the segment type it was recorded on
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabeledSample {
    pub distance: f64,
    pub time: f64,
    pub label: SegmentLabel,
}

/// Maps lap distances to segment labels using the boundary tables it was
/// built with.
#[derive(Clone, Copy, Debug)]
pub struct SegmentLabeler<'a> {
    tables: &'a BoundaryTables,
}

impl<'a> SegmentLabeler<'a> {
    pub fn new(tables: &'a BoundaryTables) -> Self {
        Self { tables }
    }

    pub fn table(&self, track_key: &str) -> Result<&'a BoundaryTable, CorneringError> {
        self.tables
            .get(track_key)
            .ok_or_else(|| CorneringError::UnknownTrackKey {
                key: track_key.to_string(),
            })
    }

    /// Label of the first interval with `start < distance <= end`, STRAIGHT
    /// when none matches
    pub fn label(&self, track_key: &str, distance: f64) -> Result<SegmentLabel, CorneringError> {
        Ok(self.table(track_key)?.label_at(distance))
    }

    /// Label every sample of a lap
    pub fn label_lap(
        &self,
        track_key: &str,
        samples: &[TelemetrySample],
    ) -> Result<Vec<LabeledSample>, CorneringError> {
        let table = self.table(track_key)?;
        Ok(samples
            .iter()
            .map(|sample| LabeledSample {
                distance: sample.distance,
                time: sample.time,
                label: table.label_at(sample.distance),
            })
            .collect())
    }
}
