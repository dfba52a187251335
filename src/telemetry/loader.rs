use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use log::debug;

use crate::CorneringError;

use super::{Lap, Session, TelemetryOutput};

/// Load a single session from a JSON-lines telemetry dump.
///
/// The dump starts with a `SessionChange` line; each lap starts with a
/// `LapStart` line followed by its `DataPoint` lines.
pub fn load_session_jsonl(source_file: &Path) -> Result<Session, CorneringError> {
    let telemetry_lines = serde_jsonlines::json_lines(source_file)
        .map_err(|e| CorneringError::SessionLoaderError { source: e })?
        .collect::<Result<Vec<TelemetryOutput>, std::io::Error>>()
        .map_err(|e| CorneringError::SessionLoaderError { source: e })?;

    let invalid = |reason: &str| CorneringError::InvalidSessionFile {
        path: format!("{:?}", source_file),
        reason: reason.to_string(),
    };

    let mut session: Option<Session> = None;
    let mut cur_lap: Option<Lap> = None;
    for line in telemetry_lines {
        match line {
            TelemetryOutput::SessionChange(session_info) => {
                if session.is_some() {
                    return Err(invalid("more than one session in file"));
                }
                session = Some(Session::new(session_info, Vec::new()));
            }
            TelemetryOutput::LapStart(lap_info) => {
                let session = session
                    .as_mut()
                    .ok_or_else(|| invalid("lap before session header"))?;
                if let Some(lap) = cur_lap.take() {
                    session.laps.push(lap);
                }
                cur_lap = Some(Lap {
                    info: lap_info,
                    samples: Vec::new(),
                });
            }
            TelemetryOutput::DataPoint(sample) => {
                cur_lap
                    .as_mut()
                    .ok_or_else(|| invalid("telemetry sample outside of a lap"))?
                    .samples
                    .push(sample);
            }
        }
    }

    let mut session = session.ok_or_else(|| invalid("missing session header"))?;
    if let Some(lap) = cur_lap {
        session.laps.push(lap);
    }
    debug!(
        "Loaded {} laps for {} from {:?}",
        session.laps.len(),
        session.info.name(),
        source_file
    );
    Ok(session)
}

/// Write a session as a JSON-lines telemetry dump readable by [`load_session_jsonl`]
pub fn write_session_jsonl(file: &Path, session: &Session) -> Result<(), CorneringError> {
    let writer_error = |e| CorneringError::WriterError {
        what: format!("session file {:?}", file),
        source: e,
    };
    let session_file = File::create(file).map_err(writer_error)?;
    let mut session_file_writer = BufWriter::new(session_file);

    let lines = std::iter::once(TelemetryOutput::SessionChange(session.info.clone())).chain(
        session.laps.iter().flat_map(|lap| {
            std::iter::once(TelemetryOutput::LapStart(lap.info.clone()))
                .chain(lap.samples.iter().copied().map(TelemetryOutput::DataPoint))
        }),
    );
    for line in lines {
        let json = serde_json::to_string(&line).map_err(|e| CorneringError::SerializeError {
            what: "telemetry line".to_string(),
            source: e,
        })?;
        writeln!(session_file_writer, "{}", json).map_err(writer_error)?;
    }
    session_file_writer.flush().map_err(writer_error)?;
    Ok(())
}
