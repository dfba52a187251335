use itertools::Itertools;
use serde::{Deserialize, Serialize};
use uom::si::f64::Velocity;
use uom::si::velocity::{kilometer_per_hour, meter_per_second};

use crate::track_metadata::SegmentLabel;

use super::Segment;

/// Distance and time accumulated on one segment type
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelTotals {
    /// Meters
    pub distance: f64,
    /// Seconds
    pub time: f64,
}

impl LabelTotals {
    pub fn new(distance: f64, time: f64) -> Self {
        Self { distance, time }
    }

    /// Average speed in m/s, 0 when no time was spent on the segment type
    pub fn speed(&self) -> f64 {
        if self.time > 0. {
            self.distance / self.time
        } else {
            0.
        }
    }

    pub fn speed_kmh(&self) -> f64 {
        Velocity::new::<meter_per_second>(self.speed()).get::<kilometer_per_hour>()
    }

    pub fn add(&mut self, other: LabelTotals) {
        self.distance += other.distance;
        self.time += other.time;
    }
}

/// Per-lap totals for each of the five segment types
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LapAggregate {
    totals: [LabelTotals; 5],
}

impl LapAggregate {
    pub fn get(&self, label: SegmentLabel) -> LabelTotals {
        self.totals[label.index()]
    }

    pub fn set(&mut self, label: SegmentLabel, totals: LabelTotals) {
        self.totals[label.index()] = totals;
    }

    pub fn speed(&self, label: SegmentLabel) -> f64 {
        self.get(label).speed()
    }

    /// Totals in canonical label order
    pub fn iter(&self) -> impl Iterator<Item = (SegmentLabel, LabelTotals)> + '_ {
        SegmentLabel::ALL.into_iter().zip(self.totals.iter().copied())
    }

    pub fn total_distance(&self) -> f64 {
        self.totals.iter().map(|t| t.distance).sum()
    }

    pub fn total_time(&self) -> f64 {
        self.totals.iter().map(|t| t.time).sum()
    }
}

impl FromIterator<(SegmentLabel, LabelTotals)> for LapAggregate {
    fn from_iter<T: IntoIterator<Item = (SegmentLabel, LabelTotals)>>(iter: T) -> Self {
        let mut aggregate = LapAggregate::default();
        for (label, totals) in iter {
            aggregate.totals[label.index()].add(totals);
        }
        aggregate
    }
}

/// Reduce a lap's segments to per-label distance and time.
///
/// Each segment contributes the gap between its start and the next segment's
/// start, so the final segment of the sequence never contributes.
// TODO: confirm with the data owners whether the final segment should count;
// published season totals were computed without it.
pub fn aggregate_lap(segments: &[Segment]) -> LapAggregate {
    segments
        .iter()
        .tuple_windows()
        .map(|(segment, next)| {
            (
                segment.label,
                LabelTotals::new(
                    next.start.distance - segment.start.distance,
                    next.start.time - segment.start.time,
                ),
            )
        })
        .collect()
}
