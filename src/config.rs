use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::CorneringError;
use crate::analysis::{CornerProfile, DataQualityPolicy, ExclusionRule, SessionRange};
use crate::track_metadata::{BoundaryTables, SegmentLabel, load_or_bundled};

const CONFIG_DIR_NAME: &str = "cornering";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Boundary table file, the bundled tables when None
    pub boundary_tables: Option<PathBuf>,
    /// Sessions analysed even though wet weather tyres were used
    pub wet_session_overrides: Vec<String>,
    pub exclusions: Vec<ExclusionRule>,
    pub session_ranges: Vec<SessionRange>,
    pub projection_budget: CornerProfile,
    pub max_rounds: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            boundary_tables: None,
            wet_session_overrides: vec![
                "2023 Season Round 10: British Grand Prix - Qualifying".to_string(),
            ],
            exclusions: vec![
                ExclusionRule::new(
                    "United States Grand Prix",
                    "Aston Martin",
                    Some(SegmentLabel::MediumHigh),
                ),
                ExclusionRule::new("Las Vegas Grand Prix", "McLaren", None),
            ],
            session_ranges: vec![
                SessionRange::new("Bahrain-Canada", None, Some(9)),
                SessionRange::new("Austria-Italy", Some(9), Some(15)),
                SessionRange::new("Singapore onwards", Some(15), None),
            ],
            projection_budget: CornerProfile::default_budget(),
            max_rounds: 29,
        }
    }
}

impl AnalysisConfig {
    pub fn default_path() -> Option<PathBuf> {
        Some(
            dirs::config_dir()?
                .join(CONFIG_DIR_NAME)
                .join(CONFIG_FILE_NAME),
        )
    }

    pub fn from_file(path: &Path) -> Result<Self, CorneringError> {
        debug!("Loading config from {:?}", path);
        let file =
            std::fs::File::open(path).map_err(|e| CorneringError::ConfigIOError { source: e })?;
        serde_json::from_reader(file).map_err(|e| CorneringError::ConfigSerializeError { source: e })
    }

    /// Config from the user's config directory, if one was saved there
    pub fn from_local_file() -> Result<Option<Self>, CorneringError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path).map(Some),
            _ => Ok(None),
        }
    }

    /// Config from `path` when given, else the local file, else defaults
    pub fn load(path: Option<&Path>) -> Result<Self, CorneringError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::from_local_file()?.unwrap_or_default()),
        }
    }

    pub fn save(&self) -> Result<(), CorneringError> {
        let config_path = Self::default_path().ok_or(CorneringError::NoConfigDir)?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<(), CorneringError> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| CorneringError::ConfigIOError { source: e })?;
        }

        let file = std::fs::File::create(config_path)
            .map_err(|e| CorneringError::ConfigIOError { source: e })?;
        serde_json::to_writer_pretty(file, self)
            .map_err(|e| CorneringError::ConfigSerializeError { source: e })
    }

    pub fn boundary_tables(&self) -> Result<BoundaryTables, CorneringError> {
        load_or_bundled(self.boundary_tables.as_deref())
    }

    pub fn data_quality_policy(&self) -> DataQualityPolicy {
        DataQualityPolicy::new(self.exclusions.clone())
    }
}
