use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::track_metadata::SegmentLabel;

use super::records::CornerRecord;

/// Rows of `team` at `gp_name` known to be unrepresentative, on `label` or on
/// every segment type when `label` is None
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExclusionRule {
    pub gp_name: String,
    pub team: String,
    #[serde(default)]
    pub label: Option<SegmentLabel>,
}

impl ExclusionRule {
    pub fn new(
        gp_name: impl Into<String>,
        team: impl Into<String>,
        label: Option<SegmentLabel>,
    ) -> Self {
        Self {
            gp_name: gp_name.into(),
            team: team.into(),
            label,
        }
    }

    pub fn matches(&self, record: &CornerRecord) -> bool {
        record.gp_name == self.gp_name
            && record.team == self.team
            && self.label.is_none_or(|label| label == record.corner_type)
    }

    fn labels(&self) -> Vec<SegmentLabel> {
        match self.label {
            Some(label) => vec![label],
            None => SegmentLabel::ALL.to_vec(),
        }
    }
}

/// Replaces excluded rows with the mean of the other teams at the same event
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataQualityPolicy {
    rules: Vec<ExclusionRule>,
}

impl DataQualityPolicy {
    pub fn new(rules: Vec<ExclusionRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[ExclusionRule] {
        &self.rules
    }

    /// Drop every row matched by a rule, then add one imputed row per rule
    /// and affected label. The imputed row takes the mean distance and time
    /// of the rows for the same event and label, and the integer part of
    /// their median session number. Rows imputed by earlier rules count as
    /// donors for later ones.
    pub fn apply(&self, records: &[CornerRecord]) -> Vec<CornerRecord> {
        let mut kept: Vec<CornerRecord> = records
            .iter()
            .filter(|record| !self.rules.iter().any(|rule| rule.matches(record)))
            .cloned()
            .collect();
        info!(
            "Excluded {} rows matching {} data quality rules",
            records.len() - kept.len(),
            self.rules.len()
        );

        for rule in &self.rules {
            for label in rule.labels() {
                let donors: Vec<&CornerRecord> = kept
                    .iter()
                    .filter(|record| record.gp_name == rule.gp_name && record.corner_type == label)
                    .collect();
                if donors.is_empty() {
                    warn!(
                        "No {} rows at {} to impute {} from",
                        label, rule.gp_name, rule.team
                    );
                    continue;
                }

                let count = donors.len() as f64;
                let record = CornerRecord {
                    distance: donors.iter().map(|r| r.distance).sum::<f64>() / count,
                    time: donors.iter().map(|r| r.time).sum::<f64>() / count,
                    corner_type: label,
                    team: rule.team.clone(),
                    gp_name: rule.gp_name.clone(),
                    session_number: median_session(&donors),
                };
                info!(
                    "Imputed {} {} at {}: {:.3} m in {:.3} s",
                    record.team, label, record.gp_name, record.distance, record.time
                );
                kept.push(record);
            }
        }

        kept
    }
}

fn median_session(donors: &[&CornerRecord]) -> u32 {
    let mut sessions: Vec<u32> = donors.iter().map(|r| r.session_number).collect();
    sessions.sort_unstable();
    let mid = sessions.len() / 2;
    if sessions.len() % 2 == 0 {
        (sessions[mid - 1] + sessions[mid]) / 2
    } else {
        sessions[mid]
    }
}
