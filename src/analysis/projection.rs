use log::warn;

use crate::CorneringError;
use crate::track_metadata::SegmentLabel;

use super::performance::TeamPerformanceTable;
use super::profile::CornerProfile;

#[derive(Clone, Debug, PartialEq)]
pub struct ProjectedLap {
    pub team: String,
    /// Seconds
    pub lap_time: f64,
    /// Seconds behind the fastest projected lap
    pub gap: f64,
}

/// Projected lap times, fastest first, and the teams no time could be
/// projected for
#[derive(Debug, Default)]
pub struct Projection {
    pub entries: Vec<ProjectedLap>,
    pub undefined: Vec<(String, CorneringError)>,
}

impl Projection {
    pub fn fastest(&self) -> Option<&ProjectedLap> {
        self.entries.first()
    }
}

/// Estimates how long each team would need to cover a reference lap, given
/// how much faster or slower than average it is on each segment type.
pub struct LapTimeProjector<'a> {
    table: &'a TeamPerformanceTable,
}

impl<'a> LapTimeProjector<'a> {
    pub fn new(table: &'a TeamPerformanceTable) -> Self {
        Self { table }
    }

    /// Projected lap time of one team: the budget of every segment type
    /// divided by the team's ratio to the field average on it
    pub fn project_team(&self, team: &str, budget: &CornerProfile) -> Result<f64, CorneringError> {
        SegmentLabel::ALL.into_iter().try_fold(0., |lap_time, label| {
            let ratio = self.table.ratio_to_average(team, label)?;
            if ratio == 0. || !ratio.is_finite() {
                return Err(CorneringError::UndefinedProjection {
                    team: team.to_string(),
                    label,
                });
            }
            Ok(lap_time + budget.get(label) / ratio)
        })
    }

    /// Every team's projected lap, ordered by time then team name
    pub fn project(&self, budget: &CornerProfile) -> Projection {
        let mut projection = Projection::default();
        for team in self.table.teams() {
            match self.project_team(team, budget) {
                Ok(lap_time) => projection.entries.push(ProjectedLap {
                    team: team.to_string(),
                    lap_time,
                    gap: 0.,
                }),
                Err(e) => {
                    warn!("No projected lap time for {}: {}", team, e);
                    projection.undefined.push((team.to_string(), e));
                }
            }
        }

        projection
            .entries
            .sort_by(|a, b| a.lap_time.total_cmp(&b.lap_time).then_with(|| a.team.cmp(&b.team)));
        if let Some(fastest) = projection.entries.first().map(|e| e.lap_time) {
            for entry in projection.entries.iter_mut() {
                entry.gap = entry.lap_time - fastest;
            }
        }
        projection
    }
}
