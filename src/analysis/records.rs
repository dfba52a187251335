use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::segmentation::{LabelTotals, LapAggregate};
use crate::track_metadata::SegmentLabel;

/// Lap totals tagged with the team and session they were recorded in
#[derive(Clone, Debug, PartialEq)]
pub struct LapRecord {
    pub team: String,
    pub gp_name: String,
    /// Round number of the session within its season
    pub session_number: u32,
    pub aggregate: LapAggregate,
}

impl LapRecord {
    /// One flat row per segment type, in canonical label order
    pub fn to_corner_records(&self) -> Vec<CornerRecord> {
        self.aggregate
            .iter()
            .map(|(label, totals)| CornerRecord {
                distance: totals.distance,
                time: totals.time,
                corner_type: label,
                team: self.team.clone(),
                gp_name: self.gp_name.clone(),
                session_number: self.session_number,
            })
            .collect()
    }
}

/// Persisted row: totals of one team on one segment type in one session
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CornerRecord {
    #[serde(rename = "Distance")]
    pub distance: f64,
    #[serde(rename = "Time")]
    pub time: f64,
    #[serde(rename = "CornerType")]
    pub corner_type: SegmentLabel,
    #[serde(rename = "Team")]
    pub team: String,
    #[serde(rename = "GPName")]
    pub gp_name: String,
    #[serde(rename = "SessionNumber")]
    pub session_number: u32,
}

impl CornerRecord {
    pub fn totals(&self) -> LabelTotals {
        LabelTotals::new(self.distance, self.time)
    }
}

/// Flatten lap records into persisted rows
pub fn corner_records(laps: &[LapRecord]) -> Vec<CornerRecord> {
    laps.iter().flat_map(LapRecord::to_corner_records).collect()
}

/// Rebuild lap records from persisted rows, grouping rows of the same team
/// and session. Output is ordered by session number, GP name and team.
pub fn lap_records(records: &[CornerRecord]) -> Vec<LapRecord> {
    let mut laps: BTreeMap<(u32, &str, &str), LapAggregate> = BTreeMap::new();
    for record in records {
        let aggregate = laps
            .entry((
                record.session_number,
                record.gp_name.as_str(),
                record.team.as_str(),
            ))
            .or_default();
        let mut totals = aggregate.get(record.corner_type);
        totals.add(record.totals());
        aggregate.set(record.corner_type, totals);
    }

    laps.into_iter()
        .map(|((session_number, gp_name, team), aggregate)| LapRecord {
            team: team.to_string(),
            gp_name: gp_name.to_string(),
            session_number,
            aggregate,
        })
        .collect()
}

/// Named half-open window of session numbers, e.g. sessions 9 to 14
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionRange {
    pub name: String,
    /// First included session, unbounded when None
    #[serde(default)]
    pub from: Option<u32>,
    /// First excluded session, unbounded when None
    #[serde(default)]
    pub until: Option<u32>,
}

impl SessionRange {
    pub fn new(name: impl Into<String>, from: Option<u32>, until: Option<u32>) -> Self {
        Self {
            name: name.into(),
            from,
            until,
        }
    }

    pub fn contains(&self, session_number: u32) -> bool {
        self.from.is_none_or(|from| session_number >= from)
            && self.until.is_none_or(|until| session_number < until)
    }

    pub fn filter(&self, records: &[CornerRecord]) -> Vec<CornerRecord> {
        records
            .iter()
            .filter(|record| self.contains(record.session_number))
            .cloned()
            .collect()
    }
}
