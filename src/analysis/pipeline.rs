// Batch runs over sessions: every lap goes through labeling, segmentation
// and aggregation, failures are collected and the batch carries on

use log::{debug, warn};

use crate::CorneringError;
use crate::segmentation::{SegmentLabeler, process_lap};
use crate::telemetry::{Lap, Session};

use super::profile::{CornerProfile, TrackProfileTable};
use super::records::LapRecord;

/// A lap that could not be processed
#[derive(Debug)]
pub struct LapFailure {
    pub session: String,
    pub driver: String,
    pub team: String,
    pub error: CorneringError,
}

/// Results of a batch run and the laps that failed along the way
#[derive(Debug)]
pub struct BatchReport<T> {
    pub output: T,
    pub failures: Vec<LapFailure>,
}

impl<T: Default> Default for BatchReport<T> {
    fn default() -> Self {
        Self {
            output: T::default(),
            failures: Vec::new(),
        }
    }
}

impl<T> BatchReport<T> {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

fn failure(session: &Session, lap: &Lap, error: CorneringError) -> LapFailure {
    warn!(
        "Skipping lap of {} ({}) in {}: {}",
        lap.info.driver,
        lap.info.team,
        session.info.name(),
        error
    );
    LapFailure {
        session: session.info.name(),
        driver: lap.info.driver.clone(),
        team: lap.info.team.clone(),
        error,
    }
}

/// Aggregate the fastest lap of every team in a session
pub fn session_records(
    labeler: &SegmentLabeler<'_>,
    session: &Session,
) -> BatchReport<Vec<LapRecord>> {
    let track_key = session.info.name();
    let mut report: BatchReport<Vec<LapRecord>> = BatchReport::default();
    for fastest in session.team_fastest_laps() {
        let lap = fastest.lap;
        debug!(
            "{} {}: {:?} s, {:+.3} s to pole",
            lap.info.team, lap.info.driver, lap.info.lap_time_s, fastest.delta_to_pole_s
        );
        match process_lap(labeler, &track_key, &lap.samples) {
            Ok(segmented) => report.output.push(LapRecord {
                team: lap.info.team.clone(),
                gp_name: session.info.gp_name().to_string(),
                session_number: session.info.round,
                aggregate: segmented.aggregate,
            }),
            Err(e) => report.failures.push(failure(session, lap, e)),
        }
    }
    report
}

/// Team records of every session, numbered by round
pub fn season_records(
    labeler: &SegmentLabeler<'_>,
    sessions: &[Session],
) -> BatchReport<Vec<LapRecord>> {
    let mut report: BatchReport<Vec<LapRecord>> = BatchReport::default();
    for session in sessions {
        let session_report = session_records(labeler, session);
        report.output.extend(session_report.output);
        report.failures.extend(session_report.failures);
    }
    report
}

/// Profile of each session's fastest legal lap, keyed by short GP name
pub fn season_profiles(
    labeler: &SegmentLabeler<'_>,
    sessions: &[Session],
) -> BatchReport<TrackProfileTable> {
    let mut report: BatchReport<TrackProfileTable> = BatchReport::default();
    for session in sessions {
        let Some(lap) = session.fastest_lap() else {
            warn!("No valid lap in {}", session.info.name());
            continue;
        };
        match process_lap(labeler, &session.info.name(), &lap.samples) {
            Ok(segmented) => report.output.insert(
                session.info.short_name(),
                CornerProfile::from_aggregate(&segmented.aggregate),
            ),
            Err(e) => report.failures.push(failure(session, lap, e)),
        }
    }
    report
}
