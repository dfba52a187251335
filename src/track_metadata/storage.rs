// Storage implementation for boundary table persistence

use crate::errors::CorneringError;
use crate::track_metadata::types::BoundaryTables;
use log::{debug, info};
use std::fs;
use std::path::Path;

/// Hand-curated tables for the 2022 and 2023 qualifying sessions
const BUNDLED_BOUNDARY_TABLES: &str = include_str!("../../data/boundary_tables.json");

/// Parse the boundary tables shipped with the crate
pub fn bundled_boundary_tables() -> Result<BoundaryTables, CorneringError> {
    serde_json::from_str(BUNDLED_BOUNDARY_TABLES).map_err(|e| {
        CorneringError::BoundaryTableParseError {
            path: "<bundled>".to_string(),
            source: e,
        }
    })
}

/// Load boundary tables from a JSON file
pub fn load_boundary_tables(path: &Path) -> Result<BoundaryTables, CorneringError> {
    debug!("Loading boundary tables from {:?}", path);

    let content =
        fs::read_to_string(path).map_err(|e| CorneringError::BoundaryTableIOError {
            path: path.display().to_string(),
            source: e,
        })?;

    let tables: BoundaryTables =
        serde_json::from_str(&content).map_err(|e| CorneringError::BoundaryTableParseError {
            path: path.display().to_string(),
            source: e,
        })?;

    info!("Loaded {} boundary tables from {:?}", tables.len(), path);
    Ok(tables)
}

/// Load tables from `path` when given, the bundled tables otherwise
pub fn load_or_bundled(path: Option<&Path>) -> Result<BoundaryTables, CorneringError> {
    match path {
        Some(path) => load_boundary_tables(path),
        None => bundled_boundary_tables(),
    }
}

/// Save boundary tables to a JSON file, creating parent directories as needed
pub fn save_boundary_tables(path: &Path, tables: &BoundaryTables) -> Result<(), CorneringError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| CorneringError::BoundaryTableIOError {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    let content =
        serde_json::to_string_pretty(tables).map_err(|e| CorneringError::SerializeError {
            what: "boundary tables".to_string(),
            source: e,
        })?;

    fs::write(path, content).map_err(|e| CorneringError::BoundaryTableIOError {
        path: path.display().to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track_metadata::types::{BoundaryTable, SegmentLabel};
    use tempfile::TempDir;

    const BAHRAIN: &str = "2023 Season Round 1: Bahrain Grand Prix - Qualifying";
    const ABU_DHABI_2022: &str = "2022 Season Round 22: Abu Dhabi Grand Prix - Qualifying";
    const ABU_DHABI_2023: &str = "2023 Season Round 22: Abu Dhabi Grand Prix - Qualifying";

    #[test]
    fn test_bundled_tables_parse() {
        let tables = bundled_boundary_tables().unwrap();

        let bahrain = tables.get(BAHRAIN).unwrap();
        assert_eq!(bahrain.intervals().len(), 9);
        assert_eq!(bahrain.label_at(600.), SegmentLabel::Low);
        assert_eq!(bahrain.label_at(1000.), SegmentLabel::Straight);
    }

    #[test]
    fn test_bundled_abu_dhabi_alias() {
        let tables = bundled_boundary_tables().unwrap();
        assert_eq!(tables.get(ABU_DHABI_2023), tables.get(ABU_DHABI_2022));
        assert!(tables.get(ABU_DHABI_2023).is_some());
    }

    #[test]
    fn test_save_and_load_tables() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("tables.json");

        let tables = BoundaryTables::new()
            .with_table(
                "Test Track",
                [(SegmentLabel::Low, 0., 100.), (SegmentLabel::High, 100., 300.)]
                    .into_iter()
                    .collect::<BoundaryTable>(),
            )
            .with_alias("Test Track Reversed", "Test Track");

        save_boundary_tables(&path, &tables).unwrap();
        let loaded = load_boundary_tables(&path).unwrap();
        assert_eq!(loaded, tables);
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = load_boundary_tables(&temp_dir.path().join("missing.json"));
        assert!(matches!(
            result,
            Err(CorneringError::BoundaryTableIOError { .. })
        ));
    }

    #[test]
    fn test_load_invalid_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.json");
        fs::write(&path, "{\"tables\": {\"x\": [{\"label\": \"FAST\"}]}}").unwrap();
        assert!(matches!(
            load_boundary_tables(&path),
            Err(CorneringError::BoundaryTableParseError { .. })
        ));
    }
}
