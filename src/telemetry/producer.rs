use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::CorneringError;

use super::{Session, SessionType, load_session_jsonl};

/// A trait for retrieving recorded sessions from a telemetry provider.
///
/// This abstracts the data source (a live timing API, a local cache, test
/// fixtures) so the segmentation pipeline only ever sees fully loaded
/// [`Session`] values. Implementations are responsible for handing out laps
/// whose samples have non-decreasing distance and time.
pub trait SessionProvider {
    /// Load a session of a season.
    ///
    /// Returns `Ok(None)` when the season has no such round, which ends
    /// season iteration.
    ///
    /// # Errors
    ///
    /// Returns an error if the session exists but cannot be loaded.
    fn load_session(
        &mut self,
        year: u16,
        round: u32,
        session_type: SessionType,
    ) -> Result<Option<Session>, CorneringError>;
}

/// Provider reading JSON-lines dumps laid out as
/// `<root>/<year>/round_<NN>_<session code>.jsonl`.
pub struct JsonlSessionProvider {
    root: PathBuf,
}

impl JsonlSessionProvider {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the dump for a session
    pub fn session_path(&self, year: u16, round: u32, session_type: SessionType) -> PathBuf {
        self.root.join(year.to_string()).join(format!(
            "round_{:02}_{}.jsonl",
            round,
            session_type.code()
        ))
    }
}

impl SessionProvider for JsonlSessionProvider {
    fn load_session(
        &mut self,
        year: u16,
        round: u32,
        session_type: SessionType,
    ) -> Result<Option<Session>, CorneringError> {
        let path = self.session_path(year, round, session_type);
        if !path.exists() {
            debug!("No session file at {:?}", path);
            return Ok(None);
        }
        load_session_jsonl(&path).map(Some)
    }
}

/// Load every dry session of a season, in round order.
///
/// Rounds are requested from 1 up to `max_rounds` and iteration stops at the
/// first round the provider does not know. Sessions where wet-weather tyres
/// were used are skipped unless their name is listed in `wet_overrides`.
pub fn season_sessions(
    provider: &mut impl SessionProvider,
    year: u16,
    session_type: SessionType,
    max_rounds: u32,
    wet_overrides: &[String],
) -> Result<Vec<Session>, CorneringError> {
    let mut sessions = Vec::new();
    for round in 1..=max_rounds {
        let Some(session) = provider.load_session(year, round, session_type)? else {
            break;
        };
        let name = session.info.name();
        info!("Loading {}", name);

        if session.is_wet() && !wet_overrides.contains(&name) {
            warn!("Wet weather tyres were used in {}. Skipping this event", name);
            continue;
        }
        sessions.push(session);
    }
    Ok(sessions)
}
