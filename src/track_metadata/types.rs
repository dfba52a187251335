// Core data structures for track boundary tables

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Corner-speed band a telemetry sample is attributed to.
///
/// Bands are defined by the minimum speed through the corner:
/// LOW below 100 km/h, MEDIUM-LOW 100-150 km/h, MEDIUM-HIGH 150-200 km/h,
/// HIGH above 200 km/h. STRAIGHT covers full-throttle running with no cornering.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SegmentLabel {
    #[serde(rename = "LOW")]
    Low,
    #[serde(rename = "MEDIUM-LOW")]
    MediumLow,
    #[serde(rename = "MEDIUM-HIGH")]
    MediumHigh,
    #[serde(rename = "HIGH")]
    High,
    #[serde(rename = "STRAIGHT")]
    Straight,
}

impl SegmentLabel {
    /// All labels in canonical order
    pub const ALL: [SegmentLabel; 5] = [
        SegmentLabel::Low,
        SegmentLabel::MediumLow,
        SegmentLabel::MediumHigh,
        SegmentLabel::High,
        SegmentLabel::Straight,
    ];

    /// Position of the label in [`SegmentLabel::ALL`]
    pub fn index(self) -> usize {
        match self {
            SegmentLabel::Low => 0,
            SegmentLabel::MediumLow => 1,
            SegmentLabel::MediumHigh => 2,
            SegmentLabel::High => 3,
            SegmentLabel::Straight => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SegmentLabel::Low => "LOW",
            SegmentLabel::MediumLow => "MEDIUM-LOW",
            SegmentLabel::MediumHigh => "MEDIUM-HIGH",
            SegmentLabel::High => "HIGH",
            SegmentLabel::Straight => "STRAIGHT",
        }
    }

    /// Get a human-readable description of the band
    pub fn description(self) -> &'static str {
        match self {
            SegmentLabel::Low => "Low speed corner (<100km/h)",
            SegmentLabel::MediumLow => "Medium-low speed corner (100-150km/h)",
            SegmentLabel::MediumHigh => "Medium-high speed corner (150-200km/h)",
            SegmentLabel::High => "High speed corner (>200km/h)",
            SegmentLabel::Straight => "Straight",
        }
    }
}

impl fmt::Display for SegmentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SegmentLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SegmentLabel::ALL
            .into_iter()
            .find(|label| label.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown corner type: {}", s))
    }
}

/// One labeled distance interval of a track.
///
/// The interval is left-open and right-closed: a sample exactly on `start`
/// belongs to whatever precedes the interval.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct BoundaryInterval {
    pub label: SegmentLabel,
    /// Meters from the start/finish line, exclusive
    pub start: f64,
    /// Meters from the start/finish line, inclusive
    pub end: f64,
}

impl BoundaryInterval {
    pub fn new(label: SegmentLabel, start: f64, end: f64) -> Self {
        Self { label, start, end }
    }

    pub fn contains(&self, distance: f64) -> bool {
        self.start < distance && distance <= self.end
    }
}

/// Ordered list of labeled intervals for a single track layout.
///
/// Intervals are expected not to overlap but this is not validated; when they
/// do, the first declared interval wins.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct BoundaryTable {
    intervals: Vec<BoundaryInterval>,
}

impl BoundaryTable {
    pub fn new(intervals: Vec<BoundaryInterval>) -> Self {
        Self { intervals }
    }

    pub fn intervals(&self) -> &[BoundaryInterval] {
        &self.intervals
    }

    /// Label for a distance, STRAIGHT when no interval contains it
    pub fn label_at(&self, distance: f64) -> SegmentLabel {
        self.intervals
            .iter()
            .find(|interval| interval.contains(distance))
            .map(|interval| interval.label)
            .unwrap_or(SegmentLabel::Straight)
    }
}

impl FromIterator<(SegmentLabel, f64, f64)> for BoundaryTable {
    fn from_iter<T: IntoIterator<Item = (SegmentLabel, f64, f64)>>(iter: T) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(label, start, end)| BoundaryInterval::new(label, start, end))
                .collect(),
        )
    }
}

/// Boundary tables for every known session, keyed by session display name
/// (e.g. "2023 Season Round 1: Bahrain Grand Prix - Qualifying").
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct BoundaryTables {
    tables: HashMap<String, BoundaryTable>,
    /// Sessions that reuse another session's table
    #[serde(default)]
    aliases: HashMap<String, String>,
}

impl BoundaryTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, key: impl Into<String>, table: BoundaryTable) -> Self {
        self.tables.insert(key.into(), table);
        self
    }

    pub fn with_alias(mut self, key: impl Into<String>, target: impl Into<String>) -> Self {
        self.aliases.insert(key.into(), target.into());
        self
    }

    /// Resolve a session key, following one level of aliasing
    pub fn get(&self, key: &str) -> Option<&BoundaryTable> {
        self.tables.get(key).or_else(|| {
            self.aliases
                .get(key)
                .and_then(|target| self.tables.get(target))
        })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// All resolvable keys, sorted
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .tables
            .keys()
            .chain(self.aliases.keys())
            .map(String::as_str)
            .filter(|key| self.contains(key))
            .collect();
        keys.sort_unstable();
        keys.dedup();
        keys
    }

    pub fn len(&self) -> usize {
        self.keys().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
