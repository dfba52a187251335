// Record and profile files: corner records as JSON lines, track profiles as
// a single JSON object keyed by track

use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use log::info;

use crate::CorneringError;
use crate::analysis::{CornerRecord, TrackProfileTable};

fn create_parent(path: &Path) -> Result<(), CorneringError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| CorneringError::WriterError {
            what: format!("directory {:?}", parent),
            source: e,
        })?;
    }
    Ok(())
}

pub fn write_records(path: &Path, records: &[CornerRecord]) -> Result<(), CorneringError> {
    create_parent(path)?;
    serde_jsonlines::write_json_lines(path, records).map_err(|e| CorneringError::WriterError {
        what: format!("corner records {:?}", path),
        source: e,
    })?;
    info!("Wrote {} corner records to {:?}", records.len(), path);
    Ok(())
}

pub fn read_records(path: &Path) -> Result<Vec<CornerRecord>, CorneringError> {
    let reader_error = |e| CorneringError::ReaderError {
        what: format!("corner records {:?}", path),
        source: e,
    };
    let records = serde_jsonlines::json_lines(path)
        .map_err(reader_error)?
        .collect::<Result<Vec<CornerRecord>, std::io::Error>>()
        .map_err(reader_error)?;
    info!("Read {} corner records from {:?}", records.len(), path);
    Ok(records)
}

pub fn write_profiles(path: &Path, profiles: &TrackProfileTable) -> Result<(), CorneringError> {
    let writer_error = |e| CorneringError::WriterError {
        what: format!("track profiles {:?}", path),
        source: e,
    };
    create_parent(path)?;
    let mut writer = BufWriter::new(File::create(path).map_err(writer_error)?);
    serde_json::to_writer_pretty(&mut writer, profiles).map_err(|e| {
        CorneringError::SerializeError {
            what: "track profiles".to_string(),
            source: e,
        }
    })?;
    writer.flush().map_err(writer_error)?;
    info!("Wrote {} track profiles to {:?}", profiles.len(), path);
    Ok(())
}

pub fn read_profiles(path: &Path) -> Result<TrackProfileTable, CorneringError> {
    let file = File::open(path).map_err(|e| CorneringError::ReaderError {
        what: format!("track profiles {:?}", path),
        source: e,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| CorneringError::SerializeError {
        what: format!("track profiles {:?}", path),
        source: e,
    })
}
