use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::CorneringError;
use crate::segmentation::LapAggregate;
use crate::track_metadata::SegmentLabel;

/// One value per segment type: seconds spent on each type for a track
/// profile, percentages once normalized, or a lap time budget.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CornerProfile {
    #[serde(rename = "STRAIGHT")]
    pub straight: f64,
    #[serde(rename = "LOW")]
    pub low: f64,
    #[serde(rename = "MEDIUM-LOW")]
    pub medium_low: f64,
    #[serde(rename = "MEDIUM-HIGH")]
    pub medium_high: f64,
    #[serde(rename = "HIGH")]
    pub high: f64,
}

impl CornerProfile {
    /// Lap time budget of a typical 2023 qualifying lap
    pub fn default_budget() -> Self {
        Self {
            straight: 36.493,
            low: 9.036,
            medium_low: 18.265,
            medium_high: 13.62,
            high: 6.41,
        }
    }

    pub fn get(&self, label: SegmentLabel) -> f64 {
        match label {
            SegmentLabel::Low => self.low,
            SegmentLabel::MediumLow => self.medium_low,
            SegmentLabel::MediumHigh => self.medium_high,
            SegmentLabel::High => self.high,
            SegmentLabel::Straight => self.straight,
        }
    }

    pub fn set(&mut self, label: SegmentLabel, value: f64) {
        match label {
            SegmentLabel::Low => self.low = value,
            SegmentLabel::MediumLow => self.medium_low = value,
            SegmentLabel::MediumHigh => self.medium_high = value,
            SegmentLabel::High => self.high = value,
            SegmentLabel::Straight => self.straight = value,
        }
    }

    /// Time spent on each segment type, rounded to 4 decimals
    pub fn from_aggregate(aggregate: &LapAggregate) -> Self {
        aggregate
            .iter()
            .map(|(label, totals)| (label, (totals.time * 10_000.).round() / 10_000.))
            .collect()
    }

    pub fn total(&self) -> f64 {
        self.values().iter().sum()
    }

    /// Share of the total per segment type, in percent. All zeros when the
    /// profile itself sums to zero.
    pub fn normalize(&self) -> Self {
        let total = self.total();
        if total == 0. {
            return Self::default();
        }
        SegmentLabel::ALL
            .into_iter()
            .map(|label| (label, 100. * self.get(label) / total))
            .collect()
    }

    /// Values in canonical label order
    pub fn values(&self) -> [f64; 5] {
        SegmentLabel::ALL.map(|label| self.get(label))
    }
}

impl FromIterator<(SegmentLabel, f64)> for CornerProfile {
    fn from_iter<T: IntoIterator<Item = (SegmentLabel, f64)>>(iter: T) -> Self {
        let mut profile = CornerProfile::default();
        for (label, value) in iter {
            profile.set(label, value);
        }
        profile
    }
}

/// Groups tracks with similar feature rows. Returns one cluster index per
/// input row, in the same order.
pub trait TrackClusterer {
    fn cluster(&self, features: &[[f64; 5]]) -> Vec<usize>;
}

/// Track profiles keyed by short GP name
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackProfileTable {
    profiles: BTreeMap<String, CornerProfile>,
}

impl TrackProfileTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, track: impl Into<String>, profile: CornerProfile) {
        self.profiles.insert(track.into(), profile);
    }

    pub fn get(&self, track: &str) -> Option<&CornerProfile> {
        self.profiles.get(track)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CornerProfile)> {
        self.profiles.iter().map(|(track, profile)| (track.as_str(), profile))
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn normalized(&self) -> Self {
        self.iter()
            .map(|(track, profile)| (track.to_string(), profile.normalize()))
            .collect()
    }

    /// Normalized rows in track name order
    pub fn feature_matrix(&self) -> Vec<(String, [f64; 5])> {
        self.iter()
            .map(|(track, profile)| (track.to_string(), profile.normalize().values()))
            .collect()
    }

    /// Cluster tracks on their normalized profiles, returning track name and
    /// cluster index pairs
    pub fn cluster_with(
        &self,
        clusterer: &impl TrackClusterer,
    ) -> Result<Vec<(String, usize)>, CorneringError> {
        let (tracks, features): (Vec<String>, Vec<[f64; 5]>) =
            self.feature_matrix().into_iter().unzip();
        let assignments = clusterer.cluster(&features);
        if assignments.len() != tracks.len() {
            return Err(CorneringError::InvalidUserInput {
                field: "cluster assignments".to_string(),
                reason: format!(
                    "expected {} assignments, got {}",
                    tracks.len(),
                    assignments.len()
                ),
            });
        }
        Ok(tracks.into_iter().zip(assignments).collect())
    }
}

impl FromIterator<(String, CornerProfile)> for TrackProfileTable {
    fn from_iter<T: IntoIterator<Item = (String, CornerProfile)>>(iter: T) -> Self {
        Self {
            profiles: iter.into_iter().collect(),
        }
    }
}
