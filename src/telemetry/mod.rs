pub mod loader;
pub mod producer;

use std::cmp::Ordering;
use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

pub use loader::{load_session_jsonl, write_session_jsonl};
pub use producer::{JsonlSessionProvider, SessionProvider};

/// Tyre compounds that mark a session as wet
const WET_COMPOUNDS: [&str; 2] = ["INTERMEDIATE", "WET"];

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct TelemetrySample {
    /// Meters traveled from S/F this lap
    pub distance: f64,
    /// Seconds elapsed since the start of the lap
    pub time: f64,
    /// Current speed in km/h
    pub speed: f64,
    /// Car position on the track map
    pub x: f64,
    pub y: f64,
    /// Throttle use, 0 to 100
    pub throttle: f64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct LapInfo {
    pub driver: String,
    pub team: String,
    /// None when the lap was not completed
    pub lap_time_s: Option<f64>,
    pub compound: String,
    /// Lap time deleted by the stewards (track limits etc.)
    #[serde(default)]
    pub deleted: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Lap {
    pub info: LapInfo,
    pub samples: Vec<TelemetrySample>,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SessionType {
    #[default]
    Qualifying,
    SprintShootout,
    Race,
}

impl SessionType {
    /// Short identifier used in file names
    pub fn code(&self) -> &'static str {
        match self {
            SessionType::Qualifying => "Q",
            SessionType::SprintShootout => "SQ",
            SessionType::Race => "R",
        }
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionType::Qualifying => write!(f, "Qualifying"),
            SessionType::SprintShootout => write!(f, "Sprint Shootout"),
            SessionType::Race => write!(f, "Race"),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SessionInfo {
    pub year: u16,
    pub round: u32,
    /// Event name, e.g. "Bahrain Grand Prix"
    pub event_name: String,
    pub session_type: SessionType,
}

impl Default for SessionInfo {
    fn default() -> Self {
        Self {
            year: 0,
            round: 0,
            event_name: "Unknown".to_string(),
            session_type: SessionType::Qualifying,
        }
    }
}

impl SessionInfo {
    /// Full display name, also the key of the session's boundary table
    pub fn name(&self) -> String {
        format!(
            "{} Season Round {}: {} - {}",
            self.year, self.round, self.event_name, self.session_type
        )
    }

    /// Grand prix name used to tag persisted records
    pub fn gp_name(&self) -> &str {
        &self.event_name
    }

    /// Abbreviated name used as the track display name, e.g. "Bahrain GP"
    pub fn short_name(&self) -> String {
        self.event_name.replace("Grand Prix", "GP")
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Session {
    pub info: SessionInfo,
    pub laps: Vec<Lap>,
}

/// Fastest lap of a team in a session, with the timing context the
/// session classification needs.
#[derive(Clone, Debug, PartialEq)]
pub struct TeamFastestLap<'a> {
    pub lap: &'a Lap,
    /// Fastest lap of the team that was not deleted
    pub legal_lap_time_s: Option<f64>,
    pub delta_to_pole_s: f64,
}

fn by_lap_time(a: &&Lap, b: &&Lap) -> Ordering {
    match (a.info.lap_time_s, b.info.lap_time_s) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl Session {
    pub fn new(info: SessionInfo, laps: Vec<Lap>) -> Self {
        Self { info, laps }
    }

    /// Whether any driver ran intermediate or wet tyres
    pub fn is_wet(&self) -> bool {
        self.laps
            .iter()
            .any(|lap| WET_COMPOUNDS.contains(&lap.info.compound.to_uppercase().as_str()))
    }

    /// Fastest timed lap that was not deleted
    pub fn fastest_lap(&self) -> Option<&Lap> {
        self.laps
            .iter()
            .filter(|lap| lap.info.lap_time_s.is_some() && !lap.info.deleted)
            .min_by(by_lap_time)
    }

    /// Fastest lap of every team, deleted laps included, ordered by lap time
    pub fn team_fastest_laps(&self) -> Vec<TeamFastestLap<'_>> {
        let by_team = self
            .laps
            .iter()
            .filter(|lap| lap.info.lap_time_s.is_some())
            .into_group_map_by(|lap| lap.info.team.as_str());

        let mut fastest: Vec<(&Lap, Option<f64>)> = by_team
            .into_values()
            .filter_map(|laps| {
                let legal = laps
                    .iter()
                    .copied()
                    .filter(|lap| !lap.info.deleted)
                    .min_by(by_lap_time)
                    .and_then(|lap| lap.info.lap_time_s);
                laps.into_iter().min_by(by_lap_time).map(|lap| (lap, legal))
            })
            .collect();
        fastest.sort_by(|(a, _), (b, _)| {
            by_lap_time(a, b).then_with(|| a.info.team.cmp(&b.info.team))
        });

        let pole = fastest
            .first()
            .and_then(|(lap, _)| lap.info.lap_time_s)
            .unwrap_or_default();

        fastest
            .into_iter()
            .map(|(lap, legal_lap_time_s)| TeamFastestLap {
                lap,
                legal_lap_time_s,
                delta_to_pole_s: lap.info.lap_time_s.unwrap_or_default() - pole,
            })
            .collect()
    }
}

/// One line of a session telemetry dump
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum TelemetryOutput {
    SessionChange(SessionInfo),
    LapStart(LapInfo),
    DataPoint(TelemetrySample),
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn lap(driver: &str, team: &str, lap_time_s: f64, deleted: bool) -> Lap {
        Lap {
            info: LapInfo {
                driver: driver.to_string(),
                team: team.to_string(),
                lap_time_s: Some(lap_time_s),
                compound: "SOFT".to_string(),
                deleted,
            },
            samples: vec![],
        }
    }

    fn bahrain() -> SessionInfo {
        SessionInfo {
            year: 2023,
            round: 1,
            event_name: "Bahrain Grand Prix".to_string(),
            session_type: SessionType::Qualifying,
        }
    }

    #[test]
    fn test_session_names() {
        let info = bahrain();
        assert_eq!(
            info.name(),
            "2023 Season Round 1: Bahrain Grand Prix - Qualifying"
        );
        assert_eq!(info.gp_name(), "Bahrain Grand Prix");
        assert_eq!(info.short_name(), "Bahrain GP");
    }

    #[test]
    fn test_wet_session_detection() {
        let mut session =
            Session::new(bahrain(), vec![lap("VER", "Red Bull Racing", 89.7, false)]);
        assert!(!session.is_wet());

        let mut wet_lap = lap("HAM", "Mercedes", 95.1, false);
        wet_lap.info.compound = "intermediate".to_string();
        session.laps.push(wet_lap);
        assert!(session.is_wet());
    }

    #[test]
    fn test_fastest_lap_skips_deleted() {
        let session = Session::new(
            bahrain(),
            vec![
                lap("VER", "Red Bull Racing", 89.7, false),
                lap("LEC", "Ferrari", 89.5, true),
                lap("SAI", "Ferrari", 89.9, false),
            ],
        );
        assert_eq!(session.fastest_lap().unwrap().info.driver, "VER");
    }

    #[test]
    fn test_team_fastest_laps() {
        let mut untimed = lap("ALO", "Aston Martin", 0., false);
        untimed.info.lap_time_s = None;
        let session = Session::new(
            bahrain(),
            vec![
                lap("SAI", "Ferrari", 90.0, false),
                lap("VER", "Red Bull Racing", 89.7, false),
                lap("LEC", "Ferrari", 89.5, true),
                lap("PER", "Red Bull Racing", 89.9, false),
                untimed,
            ],
        );

        let fastest = session.team_fastest_laps();
        assert_eq!(fastest.len(), 2);

        assert_eq!(fastest[0].lap.info.driver, "LEC");
        assert_eq!(fastest[0].legal_lap_time_s, Some(90.0));
        assert_eq!(fastest[0].delta_to_pole_s, 0.0);

        assert_eq!(fastest[1].lap.info.driver, "VER");
        assert_eq!(fastest[1].legal_lap_time_s, Some(89.7));
        assert!((fastest[1].delta_to_pole_s - 0.2).abs() < 1e-9);
    }
}
