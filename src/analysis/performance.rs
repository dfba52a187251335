use std::collections::BTreeMap;

use crate::CorneringError;
use crate::segmentation::{LabelTotals, LapAggregate};
use crate::track_metadata::SegmentLabel;

use super::records::{CornerRecord, LapRecord};

/// How a team's speed is compared with the field average
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IndexMode {
    /// Percentage above or below the average
    #[default]
    DeltaFromAverage,
    /// Speed divided by the average
    RatioToAverage,
}

impl IndexMode {
    pub fn apply(&self, speed: f64, average: f64) -> f64 {
        match self {
            IndexMode::DeltaFromAverage => (speed - average) * 100. / average,
            IndexMode::RatioToAverage => speed / average,
        }
    }
}

/// Summed distance and time of every team on every segment type
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TeamPerformanceTable {
    teams: BTreeMap<String, LapAggregate>,
}

impl TeamPerformanceTable {
    pub fn from_records(records: &[CornerRecord]) -> Self {
        let mut teams: BTreeMap<String, LapAggregate> = BTreeMap::new();
        for record in records {
            let aggregate = teams.entry(record.team.clone()).or_default();
            let mut totals = aggregate.get(record.corner_type);
            totals.add(record.totals());
            aggregate.set(record.corner_type, totals);
        }
        Self { teams }
    }

    pub fn from_laps(laps: &[LapRecord]) -> Self {
        let mut teams: BTreeMap<String, LapAggregate> = BTreeMap::new();
        for lap in laps {
            let aggregate = teams.entry(lap.team.clone()).or_default();
            for (label, lap_totals) in lap.aggregate.iter() {
                let mut totals = aggregate.get(label);
                totals.add(lap_totals);
                aggregate.set(label, totals);
            }
        }
        Self { teams }
    }

    /// Team names in alphabetical order
    pub fn teams(&self) -> impl Iterator<Item = &str> {
        self.teams.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn totals(&self, team: &str, label: SegmentLabel) -> Result<LabelTotals, CorneringError> {
        self.teams
            .get(team)
            .map(|aggregate| aggregate.get(label))
            .ok_or_else(|| CorneringError::MissingAggregateLabel {
                label,
                scope: team.to_string(),
            })
    }

    /// Speed in m/s from the summed totals
    pub fn speed(&self, team: &str, label: SegmentLabel) -> Result<f64, CorneringError> {
        Ok(self.totals(team, label)?.speed())
    }

    /// Mean of the team speeds on `label`, skipping teams that spent no time
    /// on it. Fails when no team has time on it or the mean is zero.
    pub fn average_speed(&self, label: SegmentLabel) -> Result<f64, CorneringError> {
        let speeds: Vec<f64> = self
            .teams
            .values()
            .map(|aggregate| aggregate.get(label))
            .filter(|totals| totals.time > 0.)
            .map(|totals| totals.speed())
            .collect();
        let average = speeds.iter().sum::<f64>() / speeds.len() as f64;
        // No index can be taken against a field that covered no distance
        if speeds.is_empty() || average == 0. || !average.is_finite() {
            return Err(CorneringError::MissingAggregateLabel {
                label,
                scope: "any team".to_string(),
            });
        }
        Ok(average)
    }

    pub fn index(
        &self,
        team: &str,
        label: SegmentLabel,
        mode: IndexMode,
    ) -> Result<f64, CorneringError> {
        let totals = self.totals(team, label)?;
        if totals.time <= 0. {
            return Err(CorneringError::MissingAggregateLabel {
                label,
                scope: team.to_string(),
            });
        }
        Ok(mode.apply(totals.speed(), self.average_speed(label)?))
    }

    pub fn delta_from_average(
        &self,
        team: &str,
        label: SegmentLabel,
    ) -> Result<f64, CorneringError> {
        self.index(team, label, IndexMode::DeltaFromAverage)
    }

    pub fn ratio_to_average(&self, team: &str, label: SegmentLabel) -> Result<f64, CorneringError> {
        self.index(team, label, IndexMode::RatioToAverage)
    }

    /// One row per team with the index for every segment type. Labels the
    /// team has no time on are None.
    pub fn index_table(&self, mode: IndexMode) -> Vec<TeamIndexRow> {
        self.teams()
            .map(|team| TeamIndexRow {
                team: team.to_string(),
                values: SegmentLabel::ALL.map(|label| self.index(team, label, mode).ok()),
            })
            .collect()
    }
}

/// Index values of one team in canonical label order
#[derive(Clone, Debug, PartialEq)]
pub struct TeamIndexRow {
    pub team: String,
    pub values: [Option<f64>; 5],
}

impl TeamIndexRow {
    pub fn get(&self, label: SegmentLabel) -> Option<f64> {
        self.values[label.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(team: &str, label: SegmentLabel, distance: f64, time: f64) -> CornerRecord {
        CornerRecord {
            distance,
            time,
            corner_type: label,
            team: team.to_string(),
            gp_name: "Bahrain Grand Prix".to_string(),
            session_number: 1,
        }
    }

    #[test]
    fn test_delta_and_ratio_around_average() {
        let table = TeamPerformanceTable::from_records(&[
            record("A", SegmentLabel::High, 500., 2.),
            record("B", SegmentLabel::High, 400., 2.),
        ]);
        assert_eq!(table.speed("A", SegmentLabel::High).unwrap(), 250.);
        assert_eq!(table.speed("B", SegmentLabel::High).unwrap(), 200.);
        assert_eq!(table.average_speed(SegmentLabel::High).unwrap(), 225.);

        let a = table.delta_from_average("A", SegmentLabel::High).unwrap();
        let b = table.delta_from_average("B", SegmentLabel::High).unwrap();
        assert!((a - 11.11).abs() < 0.01);
        assert!((b + 11.11).abs() < 0.01);

        let ratio = table.ratio_to_average("A", SegmentLabel::High).unwrap();
        assert!((ratio - 250. / 225.).abs() < 1e-12);
    }

    #[test]
    fn test_totals_are_summed_across_sessions() {
        let table = TeamPerformanceTable::from_records(&[
            record("A", SegmentLabel::Low, 100., 4.),
            record("A", SegmentLabel::Low, 300., 6.),
        ]);
        assert_eq!(
            table.totals("A", SegmentLabel::Low).unwrap(),
            LabelTotals::new(400., 10.)
        );
        assert_eq!(table.speed("A", SegmentLabel::Low).unwrap(), 40.);
    }

    #[test]
    fn test_average_skips_teams_without_time() {
        let table = TeamPerformanceTable::from_records(&[
            record("A", SegmentLabel::Low, 100., 4.),
            record("B", SegmentLabel::Low, 0., 0.),
        ]);
        assert_eq!(table.average_speed(SegmentLabel::Low).unwrap(), 25.);
        assert!(matches!(
            table.delta_from_average("B", SegmentLabel::Low),
            Err(CorneringError::MissingAggregateLabel { .. })
        ));
    }

    #[test]
    fn test_zero_field_average() {
        let table = TeamPerformanceTable::from_records(&[
            record("A", SegmentLabel::High, 0., 10.),
            record("B", SegmentLabel::High, 0., 10.),
        ]);
        assert!(matches!(
            table.average_speed(SegmentLabel::High),
            Err(CorneringError::MissingAggregateLabel {
                label: SegmentLabel::High,
                ..
            })
        ));
        assert!(table.delta_from_average("A", SegmentLabel::High).is_err());
        assert!(table.ratio_to_average("B", SegmentLabel::High).is_err());
        let rows = table.index_table(IndexMode::DeltaFromAverage);
        assert!(rows.iter().all(|row| row.get(SegmentLabel::High).is_none()));
    }

    #[test]
    fn test_missing_team_or_label() {
        let table = TeamPerformanceTable::from_records(&[record("A", SegmentLabel::Low, 100., 4.)]);
        match table.delta_from_average("Z", SegmentLabel::Low) {
            Err(CorneringError::MissingAggregateLabel { label, scope }) => {
                assert_eq!(label, SegmentLabel::Low);
                assert_eq!(scope, "Z");
            }
            other => panic!("unexpected result {:?}", other),
        }
        assert!(table.average_speed(SegmentLabel::High).is_err());
    }

    #[test]
    fn test_from_laps_matches_from_records() {
        let records = vec![
            record("A", SegmentLabel::Low, 100., 4.),
            record("A", SegmentLabel::Straight, 1000., 12.),
            record("B", SegmentLabel::Low, 90., 4.),
            record("B", SegmentLabel::Straight, 1000., 11.),
        ];
        let laps = crate::analysis::records::lap_records(&records);
        assert_eq!(
            TeamPerformanceTable::from_laps(&laps),
            TeamPerformanceTable::from_records(&records)
        );
    }

    #[test]
    fn test_index_table() {
        let table = TeamPerformanceTable::from_records(&[
            record("B", SegmentLabel::High, 400., 2.),
            record("A", SegmentLabel::High, 500., 2.),
        ]);
        let rows = table.index_table(IndexMode::RatioToAverage);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].team, "A");
        assert!(rows[0].get(SegmentLabel::High).unwrap() > 1.);
        assert!(rows[1].get(SegmentLabel::High).unwrap() < 1.);
        assert_eq!(rows[0].get(SegmentLabel::Low), None);
    }

    #[test]
    fn test_rebuilding_is_deterministic() {
        let records: Vec<CornerRecord> = (0..50)
            .map(|i| {
                record(
                    ["A", "B", "C"][i % 3],
                    SegmentLabel::ALL[i % 5],
                    10.1 * i as f64,
                    0.37 * (i + 1) as f64,
                )
            })
            .collect();
        let first = TeamPerformanceTable::from_records(&records);
        let second = TeamPerformanceTable::from_records(&records);
        for team in first.teams() {
            for label in SegmentLabel::ALL {
                assert_eq!(
                    first.totals(team, label).unwrap().distance.to_bits(),
                    second.totals(team, label).unwrap().distance.to_bits()
                );
                assert_eq!(
                    first.totals(team, label).unwrap().time.to_bits(),
                    second.totals(team, label).unwrap().time.to_bits()
                );
            }
        }
    }
}
